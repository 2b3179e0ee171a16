//! Exponential backoff for a failing playback provider

use std::time::Duration;

/// Poll delay that doubles with each consecutive failure
///
/// The first failure keeps the normal cadence, then the delay doubles up to
/// `max`. A single success resets it.
#[derive(Debug, Clone)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    failures: u32,
}

impl Backoff {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max: max.max(base),
            failures: 0,
        }
    }

    /// Records a failure and returns the number of consecutive failures
    pub fn record_failure(&mut self) -> u32 {
        self.failures = self.failures.saturating_add(1);
        self.failures
    }

    /// Records a success. Returns true when this ends a failure streak.
    pub fn record_success(&mut self) -> bool {
        let recovered = self.failures > 0;
        self.failures = 0;
        recovered
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Delay before the next poll
    pub fn delay(&self) -> Duration {
        if self.failures <= 1 {
            return self.base;
        }
        let factor = 1u32.checked_shl(self.failures - 1).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.max)
    }
}
