//! Search control: wall-clock budget for iterative deepening.

use std::time::{Duration, Instant};

/// Decides when iterative deepening should stop starting new depths.
///
/// The budget is only consulted between depths. Once a depth has started it
/// runs to completion, however long that takes.
#[derive(Debug, Clone)]
pub struct SearchControl {
    start: Instant,
    budget: Option<Duration>,
}

impl SearchControl {
    /// Start the clock with an optional budget. `None` means unlimited.
    pub fn new(budget: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// Check whether iterative deepening should stop after the depth that
    /// just completed.
    pub fn should_stop_iterating(&self) -> bool {
        self.budget.is_some_and(|budget| self.elapsed() >= budget)
    }

    /// Elapsed time since the clock started.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
