//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. The state machine calls [`evaluate`]
//! after every accepted move; nothing else sets the outcome.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{Line, LINES, check_winner};

use super::state::Outcome;
use super::types::Board;
use tracing::instrument;

/// Classifies a board: first completed line wins, else full is a draw.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some((mark, line)) = check_winner(board) {
        Outcome::Won { mark, line }
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}
