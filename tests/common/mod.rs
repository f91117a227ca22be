//! Test helpers for synchronization tests.
//!
//! Provides an in-memory repository, a canned feed source, and entry
//! builders.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};

use feedsync::feed::{FeedEntry, FeedSource, ParsedFeed};
use feedsync::sync::SyncRepository;
use feedsync::{Article, FeedSyncError, NewArticle, Result};

#[derive(Default)]
struct State {
    articles: Vec<Article>,
    build_dates: HashMap<i64, DateTime<Utc>>,
    rejected_guids: HashSet<String>,
}

/// In-memory [`SyncRepository`] with a global unique guid constraint.
#[derive(Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_article` fail for the given guid, as a storage error would.
    pub fn reject_guid(&self, guid: &str) {
        self.state
            .lock()
            .unwrap()
            .rejected_guids
            .insert(guid.to_string());
    }

    pub fn articles(&self) -> Vec<Article> {
        self.state.lock().unwrap().articles.clone()
    }

    pub fn article_count(&self) -> usize {
        self.state.lock().unwrap().articles.len()
    }

    pub fn articles_for(&self, channel_id: i64) -> Vec<Article> {
        self.articles()
            .into_iter()
            .filter(|a| a.channel_id == channel_id)
            .collect()
    }

    pub fn has_guid(&self, guid: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .articles
            .iter()
            .any(|a| a.guid == guid)
    }

    pub fn build_date(&self, channel_id: i64) -> Option<DateTime<Utc>> {
        self.state
            .lock()
            .unwrap()
            .build_dates
            .get(&channel_id)
            .copied()
    }
}

impl SyncRepository for MemoryRepository {
    async fn find_article_by_guid(&self, guid: &str) -> Result<Option<Article>> {
        let state = self.state.lock().unwrap();
        Ok(state.articles.iter().find(|a| a.guid == guid).cloned())
    }

    async fn create_article(&self, article: &NewArticle) -> Result<Article> {
        article.validate()?;
        let mut state = self.state.lock().unwrap();
        if state.rejected_guids.contains(&article.guid) {
            return Err(FeedSyncError::Database(format!(
                "insert rejected for {}",
                article.guid
            )));
        }
        if state.articles.iter().any(|a| a.guid == article.guid) {
            return Err(FeedSyncError::Database(
                "UNIQUE constraint failed: articles.guid".to_string(),
            ));
        }

        let created = Article {
            id: state.articles.len() as i64 + 1,
            channel_id: article.channel_id,
            guid: article.guid.clone(),
            title: article.title.clone(),
            description: article.description.clone(),
            content: article.content.clone(),
            published_at: article.published_at,
            url: article.url.clone(),
            image_url: article.image_url.clone(),
            created_at: Utc::now(),
        };
        state.articles.push(created.clone());
        Ok(created)
    }

    async fn update_channel_build_date(
        &self,
        channel_id: i64,
        last_build_date: DateTime<Utc>,
    ) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .build_dates
            .insert(channel_id, last_build_date);
        Ok(())
    }
}

/// Feed source serving fixed feeds by URL.
#[derive(Default)]
pub struct StaticFeedSource {
    feeds: HashMap<String, ParsedFeed>,
}

impl StaticFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, url: impl Into<String>, feed: ParsedFeed) -> Self {
        self.feeds.insert(url.into(), feed);
        self
    }
}

impl FeedSource for StaticFeedSource {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        self.feeds
            .get(url)
            .cloned()
            .ok_or_else(|| FeedSyncError::Feed(format!("HTTP error: 404 Not Found for {url}")))
    }
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - TimeDelta::hours(hours)
}

/// A valid entry published `age_hours` ago.
pub fn entry(guid: &str, age_hours: i64) -> FeedEntry {
    FeedEntry::new()
        .with_id(guid)
        .with_title(format!("Entry {guid}"))
        .with_url(format!("https://example.com/posts/{guid}"))
        .with_summary(format!("<p>Summary of <b>{guid}</b></p>"))
        .with_published_at(hours_ago(age_hours))
}

/// A recent entry that fails validation for lack of a title.
pub fn untitled_entry(guid: &str) -> FeedEntry {
    FeedEntry::new()
        .with_id(guid)
        .with_url(format!("https://example.com/posts/{guid}"))
        .with_published_at(hours_ago(1))
}
