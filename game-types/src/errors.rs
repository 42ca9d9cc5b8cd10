use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Client-facing failure taxonomy. Handlers map these onto HTTP statuses:
/// the *NotFound variants to 404, the conflict variants to 409, and
/// `Internal` to 500.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ApiError {
    UserNotFound { username: String },
    GameNotFound { game_id: String },
    UsernameTaken { username: String },
    GameAlreadyCancelled,
    GameAlreadyOver,
    Internal { message: String },
}

impl ApiError {
    pub fn message(&self) -> String {
        match self {
            ApiError::UserNotFound { username } => {
                format!("A User with the name '{}' does not exist!", username)
            }
            ApiError::GameNotFound { game_id } => format!("Game '{}' not found!", game_id),
            ApiError::UsernameTaken { username } => {
                format!("The username '{}' is already taken.", username)
            }
            ApiError::GameAlreadyCancelled => "The game has already been cancelled!".to_string(),
            ApiError::GameAlreadyOver => "The game is already over.".to_string(),
            ApiError::Internal { message } => message.clone(),
        }
    }
}
