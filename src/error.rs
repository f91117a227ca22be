//! Error types for feedsync.

use thiserror::Error;

use crate::feed::FeedEntry;

/// Common error type for feedsync.
#[derive(Error, Debug)]
pub enum FeedSyncError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant, including
    /// constraint violations such as a duplicate article guid.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for a record about to be persisted.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Feed retrieval or parsing error.
    #[error("feed error: {0}")]
    Feed(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Too many entries of a channel's feed could not be turned into articles.
    ///
    /// Articles created before the abort stay persisted.
    #[error(
        "channel {channel_id} exceeded its invalid entry budget \
         ({invalid_count} invalid, {budget} allowed); last offending entry {entry}: {reason}"
    )]
    ExceededFailureBudget {
        /// Channel whose run was aborted.
        channel_id: i64,
        /// The entry whose failure broke the budget.
        entry: Box<FeedEntry>,
        /// Invalid entries seen in the run, including the offending one.
        invalid_count: usize,
        /// Number of invalid entries the run was allowed.
        budget: f64,
        /// Why the offending entry was rejected.
        reason: String,
    },
}

impl From<sqlx::Error> for FeedSyncError {
    fn from(e: sqlx::Error) -> Self {
        FeedSyncError::Database(e.to_string())
    }
}

/// Result type alias for feedsync operations.
pub type Result<T> = std::result::Result<T, FeedSyncError>;
