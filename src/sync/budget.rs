//! Failure budget for one synchronization run.

/// Tracks invalid entries against the number a run may tolerate.
///
/// The allowance is a fraction of the feed's total entry count, fixed when
/// the run starts and compared against the running count after each
/// failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureBudget {
    allowed: f64,
    invalid: usize,
}

impl FailureBudget {
    /// Budget for a feed of `total_entries` entries.
    pub fn new(ratio: f64, total_entries: usize) -> Self {
        Self {
            allowed: ratio * total_entries as f64,
            invalid: 0,
        }
    }

    /// Count one more invalid entry. Returns true once the budget is exceeded.
    pub fn record_failure(&mut self) -> bool {
        self.invalid += 1;
        self.is_exceeded()
    }

    /// Whether more entries failed than allowed.
    pub fn is_exceeded(&self) -> bool {
        self.invalid as f64 > self.allowed
    }

    /// Number of invalid entries the run may have.
    pub fn allowed(&self) -> f64 {
        self.allowed
    }

    /// Invalid entries recorded so far.
    pub fn invalid_count(&self) -> usize {
        self.invalid
    }
}
