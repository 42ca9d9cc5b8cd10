use game_types::{Move, Outcome};
use rand::seq::SliceRandom;

/// Decide a single turn from the user's perspective and build the
/// outcome message shown to the player.
///
/// The loss condition checks the pair (user, ai) against the beats
/// table: the user loses when the opponent drew the move the user's own
/// move nominally dominates. Inverted-looking on purpose; see DESIGN.md.
pub fn resolve(user_move: Move, ai_move: Move) -> (Outcome, String) {
    if user_move == ai_move {
        return (Outcome::Tie, "That's a TIE".to_string());
    }

    if ai_move == user_move.beats() {
        let msg = format!(
            "You Lost! The AI player's {} beats your {}",
            ai_move, user_move
        );
        (Outcome::Loss, msg)
    } else {
        let msg = format!(
            "You Won, your move to {} beats mine to {}!",
            user_move, ai_move
        );
        (Outcome::Win, msg)
    }
}

/// Draw the opponent's move uniformly at random, independent of the
/// user's move. Tests bypass this and inject a fixed move instead.
pub fn draw_ai_move() -> Move {
    *Move::ALL
        .choose(&mut rand::thread_rng())
        .unwrap_or(&Move::Guard)
}
