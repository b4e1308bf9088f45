//! Cancellable fixed-delay debounce.
//!
//! Coalesces bursts of updates (keystrokes in the search box) into a single
//! delivery `delay` after the last one. Scheduling again replaces, and thereby
//! cancels, whatever was pending. Time is passed in explicitly so the event
//! loop owns the clock and tests stay deterministic.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Pending<T> {
    due: Instant,
    value: T,
}

/// Holds at most one pending value and its due time.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    /// Debouncer with a fixed delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The fixed delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` for delivery at `now + delay`, cancelling any pending value.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            due: now + self.delay,
            value,
        });
    }

    /// Take the pending value if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if pending.due <= now => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Take the pending value now, due or not.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value without delivering it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a value is waiting for its deadline.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the pending value is due, zero if overdue.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|pending| pending.due.saturating_duration_since(now))
    }
}
