//! Per-run options and outcomes.

use chrono::{DateTime, TimeDelta, Utc};

use crate::config::SyncConfig;

/// Default fraction of a feed's entries allowed to be invalid.
pub const DEFAULT_ERROR_BUDGET_RATIO: f64 = 0.1;

/// Default age, in hours, past which entries are discarded.
pub const DEFAULT_DISCARD_AFTER_HOURS: i64 = 48;

/// Options for one synchronization run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    /// Fraction of the feed's total entries that may fail before the run
    /// is aborted.
    pub error_budget_ratio: f64,
    /// Entries published at or before this instant are skipped.
    pub cutoff: DateTime<Utc>,
}

impl SyncOptions {
    /// Options with an explicit ratio and cutoff.
    pub fn new(error_budget_ratio: f64, cutoff: DateTime<Utc>) -> Self {
        Self {
            error_budget_ratio,
            cutoff,
        }
    }

    /// Options derived from configuration, with the cutoff computed from now.
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            error_budget_ratio: config.error_budget_ratio,
            cutoff: cutoff_hours_ago(config.discard_after_hours),
        }
    }

    /// Set the cutoff.
    pub fn with_cutoff(mut self, cutoff: DateTime<Utc>) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Set the error budget ratio.
    pub fn with_error_budget_ratio(mut self, ratio: f64) -> Self {
        self.error_budget_ratio = ratio;
        self
    }
}

impl Default for SyncOptions {
    /// 10% error budget, entries older than two days discarded.
    fn default() -> Self {
        Self {
            error_budget_ratio: DEFAULT_ERROR_BUDGET_RATIO,
            cutoff: cutoff_hours_ago(DEFAULT_DISCARD_AFTER_HOURS),
        }
    }
}

/// The instant `hours` before now, or the earliest representable one when
/// the window reaches past it.
fn cutoff_hours_ago(hours: i64) -> DateTime<Utc> {
    TimeDelta::try_hours(hours)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Counters for one ingestion pass over a feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Articles created.
    pub created: usize,
    /// Entries skipped: unpublished, too old, or already ingested.
    pub skipped: usize,
    /// Entries that could not be turned into articles, within budget.
    pub invalid: usize,
}

/// Result of a successful synchronization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The feed has not been rebuilt since the last run; nothing was touched.
    NoUpdateRequired,
    /// Entries were processed to the end.
    UpdateCompleted(IngestReport),
}

impl SyncOutcome {
    /// Articles created by the run.
    pub fn created(&self) -> usize {
        match self {
            SyncOutcome::NoUpdateRequired => 0,
            SyncOutcome::UpdateCompleted(report) => report.created,
        }
    }
}
