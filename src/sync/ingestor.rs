//! Entry ingestion loop.
//!
//! Walks a feed's entries in order, turning each new, recent entry into an
//! article. Entries that cannot be materialized are tolerated up to the
//! run's failure budget; past it the whole run is aborted.

use tracing::{debug, error, warn};

use crate::article::{Article, NewArticle};
use crate::channel::Channel;
use crate::feed::{derive_image_url, FeedEntry, ParsedFeed};
use crate::sync::budget::FailureBudget;
use crate::sync::options::{IngestReport, SyncOptions};
use crate::sync::repository::SyncRepository;
use crate::{FeedSyncError, Result};

/// Why an entry was skipped without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry has no publish time.
    Unpublished,
    /// The entry was published at or before the cutoff.
    TooOld,
    /// An article with the entry's guid already exists.
    AlreadyIngested,
}

impl SkipReason {
    fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Unpublished => "no publish time",
            SkipReason::TooOld => "published before cutoff",
            SkipReason::AlreadyIngested => "already ingested",
        }
    }
}

/// What happened to a single entry.
#[derive(Debug)]
enum EntryOutcome {
    Created(Article),
    Skipped(SkipReason),
    Invalid(FeedSyncError),
}

/// Ingests the entries of one feed into one channel.
pub struct EntryIngestor<'a, R> {
    repo: &'a R,
    channel: &'a Channel,
    options: &'a SyncOptions,
}

impl<'a, R: SyncRepository> EntryIngestor<'a, R> {
    /// Create an ingestor for a single run.
    pub fn new(repo: &'a R, channel: &'a Channel, options: &'a SyncOptions) -> Self {
        Self {
            repo,
            channel,
            options,
        }
    }

    /// Ingest every entry of `feed`, in feed order.
    ///
    /// # Errors
    ///
    /// Returns [`FeedSyncError::ExceededFailureBudget`] as soon as more
    /// entries have failed than the budget allows; articles created up to
    /// that point are kept. A failing guid lookup is returned as is.
    pub async fn ingest(&self, feed: &ParsedFeed) -> Result<IngestReport> {
        let mut budget = FailureBudget::new(self.options.error_budget_ratio, feed.entries.len());
        let mut report = IngestReport::default();

        for entry in &feed.entries {
            match self.ingest_entry(entry).await? {
                EntryOutcome::Created(article) => {
                    debug!(
                        "Channel {}: created article {} ({})",
                        self.channel.id, article.id, article.guid
                    );
                    report.created += 1;
                }
                EntryOutcome::Skipped(reason) => {
                    debug!(
                        "Channel {}: skipped entry {}: {}",
                        self.channel.id,
                        entry,
                        reason.as_str()
                    );
                    report.skipped += 1;
                }
                EntryOutcome::Invalid(err) => {
                    warn!("Channel {}: invalid entry {}: {}", self.channel.id, entry, err);
                    report.invalid += 1;

                    if budget.record_failure() {
                        error!(
                            "Channel {}: {} invalid entries exceed the allowed {} of {}",
                            self.channel.id,
                            budget.invalid_count(),
                            budget.allowed(),
                            feed.entries.len()
                        );
                        return Err(FeedSyncError::ExceededFailureBudget {
                            channel_id: self.channel.id,
                            entry: Box::new(entry.clone()),
                            invalid_count: budget.invalid_count(),
                            budget: budget.allowed(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        Ok(report)
    }

    async fn ingest_entry(&self, entry: &FeedEntry) -> Result<EntryOutcome> {
        if entry.published_at.is_none() {
            return Ok(EntryOutcome::Skipped(SkipReason::Unpublished));
        }
        if !entry.is_published_after(self.options.cutoff) {
            return Ok(EntryOutcome::Skipped(SkipReason::TooOld));
        }

        let Some(guid) = entry.guid() else {
            return Ok(EntryOutcome::Invalid(FeedSyncError::Validation(
                "entry has neither an id nor a url".to_string(),
            )));
        };

        // Seen entries are never updated, even if the feed edited them
        if self.repo.find_article_by_guid(guid).await?.is_some() {
            return Ok(EntryOutcome::Skipped(SkipReason::AlreadyIngested));
        }

        Ok(match self.materialize(entry, guid).await {
            Ok(article) => EntryOutcome::Created(article),
            Err(err) => EntryOutcome::Invalid(err),
        })
    }

    async fn materialize(&self, entry: &FeedEntry, guid: &str) -> Result<Article> {
        let image_url = derive_image_url(entry)?;
        let article = NewArticle::from_entry(self.channel.id, guid, entry, image_url);
        article.validate()?;
        self.repo.create_article(&article).await
    }
}
