//! Intents: what the presentation layer asks the engine to do.
//!
//! Intents are plain data. They can be logged, queued, or replayed, and
//! [`GameState::apply`] is the single entry point that turns one into the
//! next state.

use super::position::Position;
use super::state::{Actor, GameState};
use super::types::Mark;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// An actor putting the active mark on a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Who is placing.
    pub actor: Actor,
    /// Where.
    pub position: Position,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(actor: Actor, position: Position) -> Self {
        Self { actor, position }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.actor, self.position.label())
    }
}

/// Inbound intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Pick human or computer opponent (setup only).
    ConfigureMode {
        /// True for a computer opponent.
        vs_computer: bool,
    },
    /// Pick the human's mark (setup only).
    ConfigureHumanMark(Mark),
    /// Enter play on a fresh board.
    StartGame,
    /// Place the active mark.
    PlaceMark(Placement),
    /// Clear the board and keep playing.
    ResetBoard,
    /// Clear the board and go back to setup.
    ReturnToSetup,
}

impl Intent {
    /// Shorthand for a placement intent.
    pub fn place(actor: Actor, position: Position) -> Self {
        Intent::PlaceMark(Placement::new(actor, position))
    }
}

impl GameState {
    /// Applies an intent, returning the next state.
    #[instrument(skip(self))]
    pub fn apply(self, intent: Intent) -> Self {
        match intent {
            Intent::ConfigureMode { vs_computer } => self.configure_mode(vs_computer),
            Intent::ConfigureHumanMark(mark) => self.configure_human_mark(mark),
            Intent::StartGame => self.start_game(),
            Intent::PlaceMark(Placement { actor, position }) => self.place_mark(actor, position),
            Intent::ResetBoard => self.reset_board(),
            Intent::ReturnToSetup => self.return_to_setup(),
        }
    }
}
