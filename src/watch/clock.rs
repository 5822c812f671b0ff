//! Refresh timing against a monotonic clock.
//!
//! Wall-clock jumps (DST, manual clock changes) must not affect interval
//! timing, so scheduling is pure `Instant` arithmetic; the wall-clock stamp
//! shown in the header is kept elsewhere.

use std::time::{Duration, Instant};

/// Decides when the next capture is due.
#[derive(Debug, Clone, Copy)]
pub struct RefreshClock {
    interval: Duration,
    last: Option<Instant>,
}

impl RefreshClock {
    /// New clock; the first check is due immediately.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Whether the interval has elapsed since the last completed capture.
    #[must_use]
    pub fn is_due(&self) -> bool {
        self.last.is_none_or(|at| at.elapsed() >= self.interval)
    }

    /// Record a completed capture.
    pub fn mark(&mut self) {
        self.last = Some(Instant::now());
    }

    /// Make the next check due immediately (force-refresh key).
    pub fn force(&mut self) {
        self.last = None;
    }

    /// Configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}
