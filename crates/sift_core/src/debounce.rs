//! Debouncing of rapidly changing values
//!
//! A [`Debouncer`] holds at most one pending value. Every `push` replaces the
//! pending value and restarts the quiet window; `poll` hands the value out
//! only once the window has elapsed since the last push. Intermediate values
//! pushed during the window are never observed.
//!
//! The debouncer does no I/O and owns no timer. The caller passes the current
//! time in and can ask for [`Debouncer::deadline`] to know when to poll next.

use std::time::{Duration, Instant};

/// Default quiet window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Coalesces a burst of values into the last one
#[derive(Debug)]
pub struct Debouncer<T> {
    pending: Option<(T, Instant)>,
    window: Duration,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given quiet window
    pub fn new(window: Duration) -> Self {
        Self {
            pending: None,
            window,
        }
    }

    /// Create a debouncer with the default 300ms window
    pub fn with_default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }

    /// The quiet window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a new value, restarting the window at `now`
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Take the pending value if the window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = match &self.pending {
            Some((_, last)) => now.saturating_duration_since(*last) >= self.window,
            None => false,
        };
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// When the pending value becomes ready, if there is one
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, last)| *last + self.window)
    }

    /// Whether a value is waiting
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value without emitting it
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::with_default()
    }
}
