//! Move selection for the computer player.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// Picks one of `n` options.
///
/// The session hands over the number of empty squares and uses the answer
/// as an index into them, so a uniform picker gives a uniform move.
pub trait MovePicker {
    /// Returns an index in `0..n`; larger answers wrap. Never called with `n == 0`.
    fn pick(&mut self, n: usize) -> usize;
}

/// Uniform random picker.
#[derive(Debug, Clone)]
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    /// Seeds from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed seed: the same seed always produces the same games.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl MovePicker for RandomPicker {
    fn pick(&mut self, n: usize) -> usize {
        let choice = self.rng.gen_range(0..n);
        debug!(n, choice, "Random pick");
        choice
    }
}

/// Replays a fixed list of choices, then falls back to the first option.
///
/// Choices larger than the option count wrap around.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPicker {
    choices: VecDeque<usize>,
}

impl ScriptedPicker {
    /// Creates a picker that answers with `choices` in order.
    pub fn new(choices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
        }
    }
}

impl MovePicker for ScriptedPicker {
    fn pick(&mut self, n: usize) -> usize {
        self.choices.pop_front().unwrap_or(0) % n
    }
}
