//! Running tally of finished games for the current run.

use derive_getters::Getters;
use tictac_engine::{Mark, Outcome};
use tracing::{info, instrument};

/// Wins per mark and draws, kept in memory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters)]
pub struct Scoreboard {
    x_wins: u32,
    o_wins: u32,
    draws: u32,
}

impl Scoreboard {
    /// Creates an empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a finished game. In-progress outcomes are ignored.
    #[instrument(skip(self))]
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Won { mark: Mark::X, .. } => self.x_wins += 1,
            Outcome::Won { mark: Mark::O, .. } => self.o_wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::InProgress => return,
        }
        info!(x = self.x_wins, o = self.o_wins, draws = self.draws, "Scoreboard updated");
    }

    /// Total finished games.
    pub fn games(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }
}

impl std::fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "X {} | O {} | Draws {}", self.x_wins, self.o_wins, self.draws)
    }
}
