use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Immutable record of one resolved turn. Appended to the game's move
/// log, never edited or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MoveRecord {
    pub user_move: String,
    pub ai_move: String,
    pub result: String,
}

/// One game of Guard/Boost/Hit: a single user against a random opponent.
///
/// Terminal state is described by `game_over`/`cancelled`; once either is
/// true no further moves may be appended. `won` is meaningful only once
/// `game_over` is true.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Game {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_over: bool,
    pub cancelled: bool,
    pub won: bool,
    pub match_date: String, // ISO 8601 string; refreshed on completion
    pub message: String,
    pub last_user_move: String,
    pub last_ai_move: String,
    pub moves: Vec<MoveRecord>,
}
