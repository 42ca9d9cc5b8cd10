use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::game::{Game, MoveRecord};
use crate::user::User;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewGameRequest {
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MakeMoveRequest {
    pub play: String,
}

/// Public user projection: just identity, no derived stats.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Full game projection returned by every gameplay endpoint, with a
/// per-call message override (falls back to the stored outcome message).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameResponse {
    pub id: Uuid,
    pub username: String,
    pub game_over: bool,
    pub cancelled: bool,
    pub won: bool,
    pub message: String,
    pub last_user_move: String,
    pub last_ai_move: String,
    pub match_date: String,
    pub moves: Vec<MoveRecord>,
}

impl GameResponse {
    pub fn from_game(game: &Game, username: String, message: &str) -> Self {
        Self {
            id: game.id,
            username,
            game_over: game.game_over,
            cancelled: game.cancelled,
            won: game.won,
            message: if message.is_empty() {
                game.message.clone()
            } else {
                message.to_string()
            },
            last_user_move: game.last_user_move.clone(),
            last_ai_move: game.last_ai_move.clone(),
            match_date: game.match_date.clone(),
            moves: game.moves.clone(),
        }
    }
}

/// One row of the `/scores` listing (win-streak leaderboard).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreEntry {
    pub username: String,
    pub win_streak: i32,
}

/// One row of the `/rankings` listing. `win_ratio` is pre-formatted to
/// four decimal places for display.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RankEntry {
    pub username: String,
    pub total_games: i32,
    pub wins: i32,
    pub win_ratio: String,
}

impl RankEntry {
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            total_games: user.total_games,
            wins: user.wins,
            win_ratio: format!("{:.4}", user.win_ratio),
        }
    }
}

/// Rendered move log for the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistoryResponse {
    pub message: String,
}
