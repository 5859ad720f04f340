//! Trailing-edge debounce over an explicit clock.
//!
//! The caller feeds every new value through [`Debouncer::update`] and
//! periodically calls [`Debouncer::poll`]; a value is emitted once it has
//! stayed unchanged for the configured delay. Time is passed in rather than
//! read, so the behaviour is deterministic under test.

use std::time::{Duration, Instant};

/// Single-timer debouncer.
#[derive(Debug)]
pub struct Debouncer<T> {
    /// Quiet period required before a value settles.
    delay: Duration,
    /// Last emitted (or seeded) value.
    settled: T,
    /// Value waiting for the quiet period, with the time of its last change.
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// Creates a debouncer whose settled value is `initial`.
    pub const fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            settled: initial,
            pending: None,
        }
    }

    /// Records a new input value observed at `now`.
    ///
    /// A changed value restarts the timer. Returning to the settled value
    /// drops the pending update entirely.
    pub fn update(&mut self, value: T, now: Instant) {
        if value == self.settled {
            self.pending = None;
            return;
        }
        if self
            .pending
            .as_ref()
            .is_some_and(|(pending, _)| *pending == value)
        {
            return;
        }
        self.pending = Some((value, now));
    }

    /// Emits the pending value if it has been stable for the delay.
    ///
    /// Each settled value is returned exactly once.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        let (_, changed_at) = self.pending.as_ref()?;
        if now.saturating_duration_since(*changed_at) < self.delay {
            return None;
        }
        let (value, _) = self.pending.take()?;
        self.settled = value;
        Some(&self.settled)
    }

    /// Re-seeds the settled value without emitting and drops any pending update.
    pub fn reset(&mut self, value: T) {
        self.settled = value;
        self.pending = None;
    }

    /// Last value that settled (or was seeded).
    pub const fn settled(&self) -> &T {
        &self.settled
    }

    /// Returns `true` while a value is waiting for the quiet period.
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
