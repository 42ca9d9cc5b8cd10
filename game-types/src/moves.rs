use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The fixed three-move vocabulary. Every turn is one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Move {
    Guard,
    Boost,
    Hit,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Guard, Move::Boost, Move::Hit];

    /// The move this move dominates under the cyclic beats-relation:
    /// Guard beats Boost, Boost beats Hit, Hit beats Guard.
    pub fn beats(self) -> Move {
        match self {
            Move::Guard => Move::Boost,
            Move::Boost => Move::Hit,
            Move::Hit => Move::Guard,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Guard => "Guard",
            Move::Boost => "Boost",
            Move::Hit => "Hit",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Move {
    type Err = ();

    /// Case-insensitive, whitespace-tolerant. Anything outside the
    /// vocabulary is rejected so the caller can treat it as a retryable
    /// bad submission rather than an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "guard" => Ok(Move::Guard),
            "boost" => Ok(Move::Boost),
            "hit" => Ok(Move::Hit),
            _ => Err(()),
        }
    }
}

/// Result of resolving one move pair, from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Outcome {
    Tie,
    Win,
    Loss,
}
