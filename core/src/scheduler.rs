//! Debounced deferred work.
//!
//! The composer never blocks on suggestion lookups. Refreshes and restarts
//! are scheduled on a `Debouncer` and run when the host pumps the composer
//! (`Composer::run_due`). Scheduling again replaces the pending run, so only
//! the last request within the delay window executes.

use std::time::{Duration, Instant};

/// One debounced task slot.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    delay: Duration,
    due: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            due: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedule a run `delay` after `now`, replacing any pending run.
    pub fn schedule(&mut self, now: Instant) {
        self.due = Some(now + self.delay);
    }

    /// Drop the pending run, if any.
    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    /// When the pending run is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.due
    }

    /// Consume the pending run if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// Consume the pending run regardless of its deadline.
    pub fn take_pending(&mut self) -> bool {
        self.due.take().is_some()
    }
}
