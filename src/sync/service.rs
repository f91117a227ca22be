//! Channel synchronization service.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::channel::Channel;
use crate::feed::{FeedSource, ParsedFeed};
use crate::sync::freshness::needs_update;
use crate::sync::ingestor::EntryIngestor;
use crate::sync::options::{SyncOptions, SyncOutcome};
use crate::sync::repository::SyncRepository;
use crate::Result;

/// Synchronizes channels against their published feeds.
pub struct FeedSynchronizer<'a, R, S> {
    repo: &'a R,
    source: &'a S,
    options: &'a SyncOptions,
}

impl<'a, R: SyncRepository, S: FeedSource> FeedSynchronizer<'a, R, S> {
    /// Create a synchronizer.
    pub fn new(repo: &'a R, source: &'a S, options: &'a SyncOptions) -> Self {
        Self {
            repo,
            source,
            options,
        }
    }

    /// Fetch the channel's feed and synchronize against it.
    pub async fn synchronize(&self, channel: &Channel) -> Result<SyncOutcome> {
        debug!("Fetching feed for channel {}: {}", channel.id, channel.url);
        let feed = self.source.fetch(&channel.url).await?;
        self.synchronize_with_feed(channel, &feed).await
    }

    /// Synchronize a channel against an already parsed feed.
    ///
    /// Nothing is written when the feed has not been rebuilt since the
    /// channel's recorded build date. Otherwise the build date is advanced
    /// first and the entries are ingested afterwards, so an aborted run
    /// still leaves the new build date in place.
    pub async fn synchronize_with_feed(
        &self,
        channel: &Channel,
        feed: &ParsedFeed,
    ) -> Result<SyncOutcome> {
        if !needs_update(channel, feed) {
            debug!("Channel {} is up to date", channel.id);
            return Ok(SyncOutcome::NoUpdateRequired);
        }

        if let Some(last_built) = feed.last_built {
            self.repo
                .update_channel_build_date(channel.id, last_built)
                .await?;
        }

        let report = EntryIngestor::new(self.repo, channel, self.options)
            .ingest(feed)
            .await?;

        info!(
            "Channel {}: {} created, {} skipped, {} invalid",
            channel.id, report.created, report.skipped, report.invalid
        );

        Ok(SyncOutcome::UpdateCompleted(report))
    }
}

/// Result of synchronizing one channel in a batch.
#[derive(Debug)]
pub struct ChannelSyncResult {
    pub channel_id: i64,
    pub result: Result<SyncOutcome>,
}

/// Synchronize many channels, at most `concurrency` at a time.
///
/// Each channel is independent: a failure is reported in its own result and
/// does not stop the others. Results are returned in completion order.
pub async fn synchronize_channels<R, S>(
    repo: &R,
    source: &S,
    channels: Vec<Channel>,
    options: &SyncOptions,
    concurrency: usize,
) -> Vec<ChannelSyncResult>
where
    R: SyncRepository,
    S: FeedSource,
{
    let synchronizer = FeedSynchronizer::new(repo, source, options);
    let synchronizer = &synchronizer;

    stream::iter(channels)
        .map(|channel| async move {
            let result = synchronizer.synchronize(&channel).await;
            if let Err(ref e) = result {
                warn!("Failed to synchronize channel {}: {}", channel.id, e);
            }
            ChannelSyncResult {
                channel_id: channel.id,
                result,
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}
