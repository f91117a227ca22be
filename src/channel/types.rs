//! Channel types.

use chrono::{DateTime, Utc};

/// A tracked feed source.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Channel ID.
    pub id: i64,
    /// Feed URL.
    pub url: String,
    /// Channel title.
    pub title: Option<String>,
    /// Build time reported by the feed at the last synchronization.
    pub last_build_date: Option<DateTime<Utc>>,
    /// When the channel was created.
    pub created_at: DateTime<Utc>,
    /// When the channel was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Channel {
    /// Build an unsaved channel value, mostly useful in tests.
    pub fn new(id: i64, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            url: url.into(),
            title: None,
            last_build_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the last build date.
    pub fn with_last_build_date(mut self, last_build_date: DateTime<Utc>) -> Self {
        self.last_build_date = Some(last_build_date);
        self
    }
}

/// New channel for creation.
#[derive(Debug, Clone)]
pub struct NewChannel {
    /// Feed URL.
    pub url: String,
    /// Channel title.
    pub title: Option<String>,
}

impl NewChannel {
    /// Create a new channel.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
