//! Synchronization behavior against an in-memory repository.

mod common;

use chrono::{TimeZone, Utc};

use common::{entry, hours_ago, untitled_entry, MemoryRepository, StaticFeedSource};
use feedsync::feed::ParsedFeed;
use feedsync::sync::{synchronize_channels, FeedSynchronizer, IngestReport, SyncOptions, SyncOutcome};
use feedsync::{Channel, FeedSyncError};

const FEED_URL: &str = "https://example.com/feed.xml";

fn channel() -> Channel {
    Channel::new(1, FEED_URL)
}

fn options() -> SyncOptions {
    SyncOptions::default().with_cutoff(hours_ago(48))
}

#[tokio::test]
async fn test_first_sync_skips_old_entries() {
    let repo = MemoryRepository::new();
    let source = StaticFeedSource::new();
    let options = options();
    let feed = ParsedFeed::new(vec![entry("a", 24), entry("b", 24), entry("c", 72)]);

    let outcome = FeedSynchronizer::new(&repo, &source, &options)
        .synchronize_with_feed(&channel(), &feed)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::UpdateCompleted(IngestReport {
            created: 2,
            skipped: 1,
            invalid: 0,
        })
    );
    assert!(repo.has_guid("a"));
    assert!(repo.has_guid("b"));
    assert!(!repo.has_guid("c"));
}

#[tokio::test]
async fn test_rerun_with_identical_feed_creates_nothing() {
    let repo = MemoryRepository::new();
    let source = StaticFeedSource::new();
    let options = options();
    let feed = ParsedFeed::new(vec![entry("a", 24), entry("b", 24), entry("c", 72)]);
    let synchronizer = FeedSynchronizer::new(&repo, &source, &options);

    synchronizer
        .synchronize_with_feed(&channel(), &feed)
        .await
        .unwrap();
    let second = synchronizer
        .synchronize_with_feed(&channel(), &feed)
        .await
        .unwrap();

    assert_eq!(second.created(), 0);
    assert_eq!(repo.article_count(), 2);
}

#[tokio::test]
async fn test_article_fields_from_entry() {
    let repo = MemoryRepository::new();
    let source = StaticFeedSource::new();
    let options = options();
    let feed = ParsedFeed::new(vec![entry("a", 1)
        .with_content("<p><img src=\"/images/a.png\"> Body</p>")]);

    FeedSynchronizer::new(&repo, &source, &options)
        .synchronize_with_feed(&channel(), &feed)
        .await
        .unwrap();

    let article = &repo.articles()[0];
    assert_eq!(article.channel_id, 1);
    assert_eq!(article.title, "Entry a");
    assert_eq!(article.description.as_deref(), Some("Summary of a"));
    assert_eq!(
        article.content.as_deref(),
        Some("<p><img src=\"/images/a.png\"> Body</p>")
    );
    assert_eq!(article.url.as_deref(), Some("https://example.com/posts/a"));
    assert_eq!(
        article.image_url.as_deref(),
        Some("https://example.com/images/a.png")
    );
}

#[tokio::test]
async fn test_up_to_date_channel_is_not_processed() {
    let repo = MemoryRepository::new();
    let source = StaticFeedSource::new();
    let options = options();
    let built = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let channel = channel().with_last_build_date(built);
    let feed = ParsedFeed::new(vec![entry("a", 1)]).with_last_built(built);

    let outcome = FeedSynchronizer::new(&repo, &source, &options)
        .synchronize_with_feed(&channel, &feed)
        .await
        .unwrap();

    assert_eq!(outcome, SyncOutcome::NoUpdateRequired);
    assert_eq!(repo.article_count(), 0);
    assert_eq!(repo.build_date(1), None);
}

#[tokio::test]
async fn test_newer_build_is_processed_and_recorded() {
    let repo = MemoryRepository::new();
    let source = StaticFeedSource::new();
    let options = options();
    let recorded = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let built = Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap();
    let channel = channel().with_last_build_date(recorded);
    let feed = ParsedFeed::new(vec![entry("a", 1)]).with_last_built(built);

    let outcome = FeedSynchronizer::new(&repo, &source, &options)
        .synchronize_with_feed(&channel, &feed)
        .await
        .unwrap();

    assert_eq!(outcome.created(), 1);
    assert_eq!(repo.build_date(1), Some(built));
}

#[tokio::test]
async fn test_build_date_recorded_when_nothing_is_new() {
    let repo = MemoryRepository::new();
    let source = StaticFeedSource::new();
    let options = options();
    let built = Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap();
    let feed = ParsedFeed::new(vec![entry("old", 96)]).with_last_built(built);

    let outcome = FeedSynchronizer::new(&repo, &source, &options)
        .synchronize_with_feed(&channel(), &feed)
        .await
        .unwrap();

    assert_eq!(outcome.created(), 0);
    assert_eq!(repo.build_date(1), Some(built));
}

#[tokio::test]
async fn test_feed_without_build_time_leaves_date_alone() {
    let repo = MemoryRepository::new();
    let source = StaticFeedSource::new();
    let options = options();

    FeedSynchronizer::new(&repo, &source, &options)
        .synchronize_with_feed(&channel(), &ParsedFeed::new(vec![entry("a", 1)]))
        .await
        .unwrap();

    assert_eq!(repo.build_date(1), None);
}

#[tokio::test]
async fn test_failure_budget_boundary() {
    for total in [10usize, 20] {
        let allowed = total / 10;

        // Exactly at the budget: the run completes
        let repo = MemoryRepository::new();
        let source = StaticFeedSource::new();
        let options = options();
        let mut entries: Vec<_> = (0..total - allowed)
            .map(|i| entry(&format!("ok-{i}"), 1))
            .collect();
        for i in 0..allowed {
            entries.push(untitled_entry(&format!("bad-{i}")));
        }

        let outcome = FeedSynchronizer::new(&repo, &source, &options)
            .synchronize_with_feed(&channel(), &ParsedFeed::new(entries))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SyncOutcome::UpdateCompleted(IngestReport {
                created: total - allowed,
                skipped: 0,
                invalid: allowed,
            }),
            "total {total}"
        );

        // One over the budget: the run aborts, earlier articles stay
        let repo = MemoryRepository::new();
        let mut entries: Vec<_> = (0..total - allowed - 1)
            .map(|i| entry(&format!("ok-{i}"), 1))
            .collect();
        for i in 0..=allowed {
            entries.push(untitled_entry(&format!("bad-{i}")));
        }

        let result = FeedSynchronizer::new(&repo, &source, &options)
            .synchronize_with_feed(&channel(), &ParsedFeed::new(entries))
            .await;
        match result {
            Err(FeedSyncError::ExceededFailureBudget {
                channel_id,
                entry,
                invalid_count,
                ..
            }) => {
                assert_eq!(channel_id, 1);
                assert_eq!(invalid_count, allowed + 1);
                let last_bad = format!("bad-{allowed}");
                assert_eq!(entry.guid(), Some(last_bad.as_str()));
            }
            other => panic!("total {total}: expected budget error, got {other:?}"),
        }
        assert_eq!(repo.article_count(), total - allowed - 1, "total {total}");
    }
}

#[tokio::test]
async fn test_abort_keeps_articles_created_before_it() {
    let repo = MemoryRepository::new();
    let source = StaticFeedSource::new();
    let options = options();
    let feed = ParsedFeed::new(vec![
        entry("first", 1),
        untitled_entry("bad-1"),
        entry("second", 1),
        untitled_entry("bad-2"),
        entry("never", 1),
        entry("pad-1", 96),
        entry("pad-2", 96),
        entry("pad-3", 96),
        entry("pad-4", 96),
        entry("pad-5", 96),
    ]);

    let result = FeedSynchronizer::new(&repo, &source, &options)
        .synchronize_with_feed(&channel(), &feed)
        .await;

    assert!(matches!(
        result,
        Err(FeedSyncError::ExceededFailureBudget { .. })
    ));
    assert!(repo.has_guid("first"));
    assert!(repo.has_guid("second"));
    assert!(!repo.has_guid("never"));
}

#[tokio::test]
async fn test_storage_failure_counts_as_invalid() {
    let repo = MemoryRepository::new();
    repo.reject_guid("flaky");
    let source = StaticFeedSource::new();
    let options = SyncOptions::default().with_error_budget_ratio(0.5);
    let feed = ParsedFeed::new(vec![entry("flaky", 1), entry("fine", 1)]);

    let outcome = FeedSynchronizer::new(&repo, &source, &options)
        .synchronize_with_feed(&channel(), &feed)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::UpdateCompleted(IngestReport {
            created: 1,
            skipped: 0,
            invalid: 1,
        })
    );
}

#[tokio::test]
async fn test_zero_ratio_aborts_on_first_invalid_entry() {
    let repo = MemoryRepository::new();
    let source = StaticFeedSource::new();
    let options = options().with_error_budget_ratio(0.0);
    let feed = ParsedFeed::new(vec![entry("a", 1), untitled_entry("bad"), entry("b", 1)]);

    let result = FeedSynchronizer::new(&repo, &source, &options)
        .synchronize_with_feed(&channel(), &feed)
        .await;

    assert!(matches!(
        result,
        Err(FeedSyncError::ExceededFailureBudget { .. })
    ));
    assert_eq!(repo.article_count(), 1);
}

#[tokio::test]
async fn test_guid_is_unique_across_channels() {
    let repo = MemoryRepository::new();
    let source = StaticFeedSource::new();
    let options = options();
    let feed = ParsedFeed::new(vec![entry("shared", 1), entry("own", 1)]);
    let synchronizer = FeedSynchronizer::new(&repo, &source, &options);

    synchronizer
        .synchronize_with_feed(&Channel::new(1, "https://a.example.com/feed"), &feed)
        .await
        .unwrap();
    let outcome = synchronizer
        .synchronize_with_feed(&Channel::new(2, "https://b.example.com/feed"), &feed)
        .await
        .unwrap();

    assert_eq!(outcome.created(), 0);
    assert_eq!(repo.article_count(), 2);
    assert!(repo.articles_for(2).is_empty());
}

#[tokio::test]
async fn test_duplicate_guid_within_one_feed() {
    let repo = MemoryRepository::new();
    let source = StaticFeedSource::new();
    let options = options();
    let feed = ParsedFeed::new(vec![entry("dup", 1), entry("dup", 2)]);

    let outcome = FeedSynchronizer::new(&repo, &source, &options)
        .synchronize_with_feed(&channel(), &feed)
        .await
        .unwrap();

    assert_eq!(outcome.created(), 1);
    assert_eq!(repo.article_count(), 1);
}

#[tokio::test]
async fn test_channels_fail_independently() {
    let repo = MemoryRepository::new();
    let source = StaticFeedSource::new()
        .with_feed(
            "https://a.example.com/feed",
            ParsedFeed::new(vec![entry("a-1", 1), entry("a-2", 1)]),
        )
        .with_feed(
            "https://b.example.com/feed",
            ParsedFeed::new(vec![untitled_entry("b-bad"), entry("b-1", 1)]),
        )
        .with_feed(
            "https://d.example.com/feed",
            ParsedFeed::new(vec![entry("d-1", 1)]),
        );
    let channels = vec![
        Channel::new(1, "https://a.example.com/feed"),
        Channel::new(2, "https://b.example.com/feed"),
        Channel::new(3, "https://c.example.com/feed"),
        Channel::new(4, "https://d.example.com/feed"),
    ];
    let options = options();

    let mut results = synchronize_channels(&repo, &source, channels, &options, 3).await;
    results.sort_by_key(|r| r.channel_id);

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].result.as_ref().unwrap().created(), 2);
    assert!(matches!(
        results[1].result,
        Err(FeedSyncError::ExceededFailureBudget { channel_id: 2, .. })
    ));
    assert!(matches!(results[2].result, Err(FeedSyncError::Feed(_))));
    assert_eq!(results[3].result.as_ref().unwrap().created(), 1);
    assert_eq!(repo.articles_for(1).len(), 2);
    assert_eq!(repo.articles_for(4).len(), 1);
}
