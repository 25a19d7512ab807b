//! Read-only projection of the game for a rendering layer.

use super::state::{Actor, GameState, Mode, Outcome, Phase};
use super::types::Mark;
use serde::Serialize;

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    /// Cell contents, row-major.
    pub cells: [Option<Mark>; 9],
    /// Mark to move.
    pub active_mark: Mark,
    /// Board classification.
    pub outcome: Outcome,
    /// Indices of the winning line, present iff the game was won.
    pub winning_line: Option<[usize; 3]>,
    /// Opponent mode.
    pub mode: Mode,
    /// Human's mark.
    pub human_mark: Mark,
    /// Computer's mark.
    pub computer_mark: Mark,
    /// Session phase.
    pub phase: Phase,
    /// Who moves next, if anyone.
    pub turn_owner: Option<Actor>,
    /// True while the computer owns the turn; manual input should be disabled.
    pub computer_thinking: bool,
}

impl GameView {
    /// True if `index` is part of the winning line.
    pub fn is_winning_cell(&self, index: usize) -> bool {
        self.winning_line.is_some_and(|line| line.contains(&index))
    }
}

impl From<&GameState> for GameView {
    fn from(state: &GameState) -> Self {
        Self {
            cells: state.board().squares().map(|sq| sq.mark()),
            active_mark: state.active_mark(),
            outcome: state.outcome(),
            winning_line: state.winning_line().map(|line| line.map(|pos| pos.to_index())),
            mode: state.mode(),
            human_mark: state.human_mark(),
            computer_mark: state.computer_mark(),
            phase: state.phase(),
            turn_owner: state.current_turn_owner(),
            computer_thinking: state.is_computer_turn(),
        }
    }
}
