use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    // Derived fields, rewritten by the statistics sweeps
    pub total_games: i32,
    pub wins: i32,
    pub win_streak: i32,
    pub win_ratio: f64,
    pub created_at: String, // ISO 8601 string for simplicity
}

impl User {
    pub fn new(id: Uuid, username: String, email: String, created_at: String) -> Self {
        Self {
            id,
            username,
            email,
            total_games: 0,
            wins: 0,
            win_streak: 0,
            win_ratio: 0.0,
            created_at,
        }
    }
}
