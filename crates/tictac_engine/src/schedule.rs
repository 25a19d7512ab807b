//! Deferred computer moves.
//!
//! The session never sleeps itself. It asks a [`Scheduler`] to hand a
//! [`Ticket`] back after a delay, and applies the computer's move when the
//! ticket comes back, if the ticket is still current.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Default thinking time before the computer moves.
pub const COMPUTER_DELAY: Duration = Duration::from_millis(350);

/// Identifies the game state a deferred move was scheduled against.
///
/// The session bumps its epoch on every state change, so a ticket from an
/// older epoch is stale and must be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket {
    epoch: u64,
}

impl Ticket {
    /// Creates a ticket for `epoch`.
    pub fn new(epoch: u64) -> Self {
        Self { epoch }
    }

    /// Returns the epoch this ticket was issued for.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Delay-and-cancel primitive.
pub trait Scheduler {
    /// Handle used to cancel a scheduled ticket.
    type Handle;

    /// Arranges for `ticket` to be delivered after `delay`.
    fn schedule(&mut self, delay: Duration, ticket: Ticket) -> Self::Handle;

    /// Cancels a scheduled ticket. Cancelling an already delivered ticket
    /// is harmless.
    fn cancel(&mut self, handle: Self::Handle);
}

// ─────────────────────────────────────────────────────────────
//  Tokio timer
// ─────────────────────────────────────────────────────────────

/// Scheduler backed by tokio tasks.
///
/// Each ticket gets a task that sleeps and then sends the ticket down an
/// unbounded channel; the event loop drains the receiver and feeds tickets
/// back into the session. Requires a running tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<Ticket>,
}

impl TokioScheduler {
    /// Creates a scheduler and the receiver that due tickets arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Ticket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Scheduler for TokioScheduler {
    type Handle = JoinHandle<()>;

    #[instrument(skip(self))]
    fn schedule(&mut self, delay: Duration, ticket: Ticket) -> Self::Handle {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(ticket).is_err() {
                debug!(?ticket, "Receiver gone, dropping ticket");
            }
        })
    }

    fn cancel(&mut self, handle: Self::Handle) {
        handle.abort();
    }
}

// ─────────────────────────────────────────────────────────────
//  Manual clock
// ─────────────────────────────────────────────────────────────

/// Handle into a [`ManualScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ManualHandle(u64);

#[derive(Debug, Clone)]
struct Pending {
    id: u64,
    due: Duration,
    ticket: Ticket,
}

/// Deterministic scheduler driven by an explicit clock.
///
/// Nothing fires until [`ManualScheduler::advance`] moves time past a
/// ticket's due point.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

impl ManualScheduler {
    /// Creates a scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward and returns the tickets that came due, in
    /// due order.
    #[instrument(skip(self))]
    pub fn advance(&mut self, by: Duration) -> Vec<Ticket> {
        self.now += by;
        let now = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by_key(|p| (p.due, p.id));
        due.into_iter().map(|p| p.ticket).collect()
    }

    /// Current clock reading.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of tickets waiting to come due.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&mut self, delay: Duration, ticket: Ticket) -> Self::Handle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay,
            ticket,
        });
        ManualHandle(id)
    }

    fn cancel(&mut self, handle: Self::Handle) {
        self.pending.retain(|p| p.id != handle.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_fires_only_when_due() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(COMPUTER_DELAY, Ticket::new(1));

        assert!(scheduler.advance(Duration::from_millis(349)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![Ticket::new(1)]);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.now(), COMPUTER_DELAY);
    }

    #[test]
    fn test_manual_cancel_prevents_delivery() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule(COMPUTER_DELAY, Ticket::new(1));
        scheduler.cancel(handle);
        assert!(scheduler.advance(Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn test_manual_delivers_in_due_order() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::from_millis(200), Ticket::new(2));
        scheduler.schedule(Duration::from_millis(100), Ticket::new(1));
        assert_eq!(
            scheduler.advance(Duration::from_secs(1)),
            vec![Ticket::new(1), Ticket::new(2)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_delivers_after_delay() {
        let (mut scheduler, mut rx) = TokioScheduler::new();
        scheduler.schedule(COMPUTER_DELAY, Ticket::new(5));

        tokio::time::sleep(Duration::from_millis(349)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await, Some(Ticket::new(5)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_cancel_aborts_task() {
        let (mut scheduler, mut rx) = TokioScheduler::new();
        let handle = scheduler.schedule(COMPUTER_DELAY, Ticket::new(5));
        scheduler.cancel(handle);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }
}
