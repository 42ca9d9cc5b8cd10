use chrono::Utc;
use game_types::{Game, Move, MoveRecord, Outcome};
use uuid::Uuid;

use crate::resolver;

pub const INVALID_MOVE_MSG: &str = "Invalid Move Plz choose from : Boost, Guard or Hit";
pub const ALREADY_OVER_MSG: &str = "Game already over!";

/// What a single move submission did to the game.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayResult {
    /// Game was already terminal; nothing changed (idempotent no-op).
    AlreadyOver { message: String },
    /// Play was outside the vocabulary; nothing changed, caller may retry.
    InvalidMove { message: String },
    /// Both drew the same move; logged, game stays open.
    Tie { message: String },
    /// Decisive move; game is now over.
    Finished { won: bool, message: String },
}

impl PlayResult {
    pub fn message(&self) -> &str {
        match self {
            PlayResult::AlreadyOver { message }
            | PlayResult::InvalidMove { message }
            | PlayResult::Tie { message }
            | PlayResult::Finished { message, .. } => message,
        }
    }
}

/// Why a cancellation was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelError {
    AlreadyCancelled,
    AlreadyOver,
}

/// Lifecycle wrapper around a [`Game`] record.
///
/// Owns the Open -> (ties...) -> Over/Cancelled transitions and the
/// append-only move log. Persistence happens outside; every method here
/// only mutates the in-memory state.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub state: Game,
}

impl GameSession {
    /// Fresh open game for the given user.
    pub fn new(user_id: Uuid) -> Self {
        let state = Game {
            id: Uuid::new_v4(),
            user_id,
            game_over: false,
            cancelled: false,
            won: false,
            match_date: Utc::now().to_rfc3339(),
            message: String::new(),
            last_user_move: String::new(),
            last_ai_move: String::new(),
            moves: Vec::new(),
        };
        Self { state }
    }

    /// Rehydrate a session from a stored record.
    pub fn from_state(state: Game) -> Self {
        Self { state }
    }

    pub fn into_state(self) -> Game {
        self.state
    }

    /// Resolve one turn against an already-drawn opponent move.
    ///
    /// The opponent draw is a parameter so callers control the random
    /// process (the server draws uniformly, tests inject a fixed move).
    pub fn submit_move(&mut self, raw_play: &str, ai_move: Move) -> PlayResult {
        if self.state.game_over {
            return PlayResult::AlreadyOver {
                message: ALREADY_OVER_MSG.to_string(),
            };
        }

        let user_move: Move = match raw_play.parse() {
            Ok(m) => m,
            Err(()) => {
                return PlayResult::InvalidMove {
                    message: INVALID_MOVE_MSG.to_string(),
                };
            }
        };

        let (outcome, message) = resolver::resolve(user_move, ai_move);
        self.state.moves.push(MoveRecord {
            user_move: user_move.to_string(),
            ai_move: ai_move.to_string(),
            result: message.clone(),
        });

        match outcome {
            Outcome::Tie => PlayResult::Tie { message },
            Outcome::Win | Outcome::Loss => {
                let won = outcome == Outcome::Win;
                self.state.message = message.clone();
                self.state.last_user_move = user_move.to_string();
                self.state.last_ai_move = ai_move.to_string();
                self.finish(won);
                PlayResult::Finished { won, message }
            }
        }
    }

    /// Quit an open game. Cancellation runs the same completion path as
    /// a decisive move, with `won` forced false.
    pub fn cancel(&mut self) -> Result<(), CancelError> {
        if self.state.cancelled {
            return Err(CancelError::AlreadyCancelled);
        }
        if self.state.game_over {
            return Err(CancelError::AlreadyOver);
        }
        self.state.cancelled = true;
        self.finish(false);
        Ok(())
    }

    /// Render the full ordered move log for display.
    pub fn history(&self) -> String {
        self.state
            .moves
            .iter()
            .map(|m| format!("{} vs {}: {}", m.user_move, m.ai_move, m.result))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn finish(&mut self, won: bool) {
        self.state.game_over = true;
        self.state.won = won;
        self.state.match_date = Utc::now().to_rfc3339();
    }
}
