//! Wall-clock budget for stride searches.
//!
//! The clock is consulted on every call to [`SearchClock::expired`] only when the step
//! counter hits the check mask, so tight search loops do not pay for `Instant::now` on
//! every node. Once expired, the clock stays expired.

use std::time::{Duration, Instant};

/// Deadline tracker shared by one solver run.
#[derive(Debug, Clone)]
pub struct SearchClock {
    start: Instant,
    limit: Duration,
    steps: u64,
    check_mask: u64,
    expired: bool,
}

impl SearchClock {
    /// Check the clock every 256 steps.
    const DEFAULT_CHECK_MASK: u64 = 0xFF;

    /// Starts a clock with the default check mask.
    pub fn start(limit: Duration) -> Self {
        Self::with_check_mask(limit, Self::DEFAULT_CHECK_MASK)
    }

    /// Starts a clock that reads the time once every `check_mask + 1` steps.
    pub fn with_check_mask(limit: Duration, check_mask: u64) -> Self {
        Self {
            start: Instant::now(),
            limit,
            steps: 0,
            check_mask,
            expired: false,
        }
    }

    /// Total budget.
    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Time since the clock started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Counts one search step; reads the clock when the step hits the mask.
    #[inline]
    pub fn expired(&mut self) -> bool {
        if self.expired {
            return true;
        }
        self.steps = self.steps.wrapping_add(1);
        if self.steps & self.check_mask == 0 {
            return self.expired_now();
        }
        false
    }

    /// Reads the clock unconditionally.
    pub fn expired_now(&mut self) -> bool {
        if !self.expired && self.start.elapsed() >= self.limit {
            self.expired = true;
        }
        self.expired
    }

    /// Steps counted so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}
