//! feedsync - RSS/Atom channel synchronizer
//!
//! Pulls subscribed feeds, decides whether each needs re-processing, and
//! turns new entries into stored articles.

pub mod article;
pub mod channel;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod logging;
pub mod sync;

pub use article::{Article, ArticleRepository, NewArticle};
pub use channel::{Channel, ChannelRepository, NewChannel};
pub use config::Config;
pub use db::{Database, DbPool};
pub use error::{FeedSyncError, Result};
pub use feed::{FeedEntry, FeedSource, HttpFeedSource, ParsedFeed};
pub use sync::{
    synchronize_channels, ChannelSyncResult, FeedSynchronizer, IngestReport, SyncOptions,
    SyncOutcome, SyncRepository,
};
