//! Article types.

use chrono::{DateTime, Utc};

use crate::feed::{sanitize_text, FeedEntry};
use crate::{FeedSyncError, Result};

/// A persisted article.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    /// Article ID.
    pub id: i64,
    /// Channel the article was ingested from.
    pub channel_id: i64,
    /// External identifier, unique across all channels.
    pub guid: String,
    /// Article title.
    pub title: String,
    /// Plain-text description.
    pub description: Option<String>,
    /// Body content as published by the feed.
    pub content: Option<String>,
    /// When the entry was published.
    pub published_at: Option<DateTime<Utc>>,
    /// Link to the original entry.
    pub url: Option<String>,
    /// Representative image.
    pub image_url: Option<String>,
    /// When the article was created.
    pub created_at: DateTime<Utc>,
}

/// New article for creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewArticle {
    /// Channel ID.
    pub channel_id: i64,
    /// External identifier.
    pub guid: String,
    /// Article title.
    pub title: String,
    /// Plain-text description.
    pub description: Option<String>,
    /// Body content.
    pub content: Option<String>,
    /// When the entry was published.
    pub published_at: Option<DateTime<Utc>>,
    /// Link to the original entry.
    pub url: Option<String>,
    /// Representative image.
    pub image_url: Option<String>,
}

impl NewArticle {
    /// Create a new article.
    pub fn new(channel_id: i64, guid: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            channel_id,
            guid: guid.into(),
            title: title.into(),
            description: None,
            content: None,
            published_at: None,
            url: None,
            image_url: None,
        }
    }

    /// Build the article for a feed entry.
    ///
    /// The summary is reduced to plain text for the description; the
    /// content is kept as published. A missing title becomes an empty one
    /// and is rejected by [`NewArticle::validate`].
    pub fn from_entry(
        channel_id: i64,
        guid: impl Into<String>,
        entry: &FeedEntry,
        image_url: Option<String>,
    ) -> Self {
        Self {
            channel_id,
            guid: guid.into(),
            title: entry.title.clone().unwrap_or_default(),
            description: entry.summary.as_deref().map(sanitize_text),
            content: entry.content.clone(),
            published_at: entry.published_at,
            url: entry.url.clone(),
            image_url,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the published date.
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Set the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the image URL.
    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Check the fields required before persisting.
    pub fn validate(&self) -> Result<()> {
        if self.guid.trim().is_empty() {
            return Err(FeedSyncError::Validation("guid can't be blank".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(FeedSyncError::Validation("title can't be blank".to_string()));
        }
        Ok(())
    }
}
