//! Engine error types.

use derive_more::{Display, Error};

/// Errors signalled by the engine.
///
/// Illegal intents are silently ignored, so errors only come from outside
/// input: a raw cell index or a serialized state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum EngineError {
    /// Index outside `0..=8`.
    #[display("Cell index {} is out of range (must be 0-8)", _0)]
    OutOfRange(#[error(not(source))] usize),
    /// Serialized state that no sequence of legal moves can reach.
    #[display("Invalid game state: {}", _0)]
    InvalidState(#[error(not(source))] &'static str),
}
