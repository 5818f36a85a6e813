//! One-shot rewatch coverage threshold.

use serde::{Deserialize, Serialize};

/// Latched check over the rewatched counter.
///
/// Once the counter reaches `duration * percentage_check` the monitor
/// latches; the transition happens at most once and never reverts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewatchThresholdMonitor {
    percentage_check: f64,
    crossed: bool,
}

impl RewatchThresholdMonitor {
    /// `percentage_check` is the fraction of total duration that must be
    /// rewatched, in `(0, 1]`.
    pub fn new(percentage_check: f64) -> Self {
        Self {
            percentage_check,
            crossed: false,
        }
    }

    pub fn percentage_check(&self) -> f64 {
        self.percentage_check
    }

    pub fn is_crossed(&self) -> bool {
        self.crossed
    }

    /// Re-evaluate the latch. Returns true only on the call that latches it.
    ///
    /// A degenerate duration (NaN, infinite, or non-positive) makes the
    /// check meaningless and never triggers.
    pub fn check(&mut self, count_rewatched: u64, duration_secs: f64) -> bool {
        if self.crossed {
            return false;
        }
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return false;
        }
        if count_rewatched as f64 >= duration_secs * self.percentage_check {
            self.crossed = true;
            return true;
        }
        false
    }
}
