//! A game session: state plus the scheduled computer opponent.

use super::intent::Intent;
use super::picker::MovePicker;
use super::schedule::{Scheduler, Ticket};
use super::state::{Actor, GameState};
use super::view::GameView;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Owns the [`GameState`] and drives the computer's turns.
///
/// Intents go through [`Session::dispatch`]. Whenever the state changes,
/// any deferred computer move is cancelled, and if the computer now owns
/// the turn a fresh one is scheduled, so at most one is ever outstanding.
/// Due tickets come back through [`Session::fire`], which re-checks them
/// against the current state before moving.
#[derive(Debug)]
pub struct Session<S: Scheduler, P: MovePicker> {
    state: GameState,
    scheduler: S,
    picker: P,
    delay: Duration,
    epoch: u64,
    pending: Option<S::Handle>,
}

impl<S: Scheduler, P: MovePicker> Session<S, P> {
    /// Creates a session in setup.
    pub fn new(scheduler: S, picker: P, delay: Duration) -> Self {
        Self {
            state: GameState::new(),
            scheduler,
            picker,
            delay,
            epoch: 0,
            pending: None,
        }
    }

    /// Applies an intent. Returns true if the state changed.
    #[instrument(skip(self), fields(epoch = self.epoch))]
    pub fn dispatch(&mut self, intent: Intent) -> bool {
        let next = self.state.clone().apply(intent);
        self.commit(next)
    }

    /// Handles a ticket coming due. Returns true if the computer moved.
    ///
    /// Stale tickets and tickets that arrive when it is no longer the
    /// computer's turn are dropped.
    #[instrument(skip(self), fields(epoch = self.epoch))]
    pub fn fire(&mut self, ticket: Ticket) -> bool {
        if ticket.epoch() != self.epoch {
            debug!("Dropping stale computer move");
            return false;
        }
        self.pending = None;

        if !self.state.is_computer_turn() {
            debug!("Computer no longer owns the turn");
            return false;
        }

        let empty = self.state.empty_positions();
        if empty.is_empty() {
            warn!("Computer owns the turn on a full board");
            return false;
        }
        let choice = self.picker.pick(empty.len());
        if choice >= empty.len() {
            warn!(choice, options = empty.len(), "Picker chose outside the empty squares, wrapping");
        }
        let position = empty[choice % empty.len()];

        info!(%position, mark = %self.state.computer_mark(), "Computer moves");
        let next = self.state.clone().place_mark(Actor::Computer, position);
        self.commit(next)
    }

    fn commit(&mut self, next: GameState) -> bool {
        if next == self.state {
            return false;
        }
        self.state = next;
        self.epoch += 1;

        if let Some(handle) = self.pending.take() {
            debug!("Cancelling pending computer move");
            self.scheduler.cancel(handle);
        }
        if self.state.is_computer_turn() {
            debug!(delay_ms = self.delay.as_millis() as u64, epoch = self.epoch, "Scheduling computer move");
            self.pending = Some(self.scheduler.schedule(self.delay, Ticket::new(self.epoch)));
        }
        true
    }

    /// Returns the current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Projects the state for rendering.
    pub fn view(&self) -> GameView {
        GameView::from(&self.state)
    }

    /// Number of state changes so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True while a computer move is waiting to fire.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Returns the scheduler mutably, e.g. to advance a manual clock.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
