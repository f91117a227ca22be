//! Feed synchronization.
//!
//! Brings a channel's stored articles up to date with its published feed:
//! a freshness gate decides whether the feed is processed at all, then
//! entries are ingested under a per-run failure budget.

pub mod budget;
pub mod freshness;
pub mod ingestor;
pub mod options;
pub mod repository;
pub mod service;

pub use budget::FailureBudget;
pub use freshness::needs_update;
pub use ingestor::{EntryIngestor, SkipReason};
pub use options::{
    IngestReport, SyncOptions, SyncOutcome, DEFAULT_DISCARD_AFTER_HOURS,
    DEFAULT_ERROR_BUDGET_RATIO,
};
pub use repository::SyncRepository;
pub use service::{synchronize_channels, ChannelSyncResult, FeedSynchronizer};
