//! Parsed feed types.

use std::fmt;

use chrono::{DateTime, Utc};

/// A feed after parsing, independent of its wire format.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    /// Feed title.
    pub title: Option<String>,
    /// Build time the feed reports for itself, if any.
    pub last_built: Option<DateTime<Utc>>,
    /// Entries in feed order.
    pub entries: Vec<FeedEntry>,
}

impl ParsedFeed {
    /// Create a feed with the given entries and no metadata.
    pub fn new(entries: Vec<FeedEntry>) -> Self {
        Self {
            title: None,
            last_built: None,
            entries,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the reported build time.
    pub fn with_last_built(mut self, last_built: DateTime<Utc>) -> Self {
        self.last_built = Some(last_built);
        self
    }
}

/// Where an entry's media reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// A media thumbnail (e.g. `media:thumbnail`).
    Thumbnail,
    /// A media content object (e.g. `media:content`).
    Content,
    /// An enclosure link.
    Enclosure,
}

/// A media reference attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMedia {
    /// Kind of reference.
    pub kind: MediaKind,
    /// URL as found in the feed.
    pub url: String,
    /// MIME type, when the feed declares one.
    pub media_type: Option<String>,
}

impl EntryMedia {
    /// Create a media reference.
    pub fn new(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            media_type: None,
        }
    }

    /// Set the MIME type.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Whether the declared MIME type is an image type.
    pub fn is_image(&self) -> bool {
        self.media_type
            .as_deref()
            .map(|m| m.to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false)
    }
}

/// One entry of a parsed feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    /// Entry id (RSS guid or Atom id).
    pub entry_id: Option<String>,
    /// Canonical URL of the entry.
    pub url: Option<String>,
    /// Entry title.
    pub title: Option<String>,
    /// Summary, possibly HTML.
    pub summary: Option<String>,
    /// Body content, possibly HTML.
    pub content: Option<String>,
    /// When the entry was published.
    pub published_at: Option<DateTime<Utc>>,
    /// Media references.
    pub media: Vec<EntryMedia>,
}

impl FeedEntry {
    /// Create an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.entry_id = Some(id.into());
        self
    }

    /// Set the URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Set the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the publish time.
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Attach a media reference.
    pub fn with_media(mut self, media: EntryMedia) -> Self {
        self.media.push(media);
        self
    }

    /// External identifier used for deduplication: the entry id, or the
    /// entry URL when the feed gives no id.
    pub fn guid(&self) -> Option<&str> {
        self.entry_id.as_deref().or(self.url.as_deref())
    }

    /// Whether the entry was published strictly after `cutoff`.
    ///
    /// Entries without a publish time never are.
    pub fn is_published_after(&self, cutoff: DateTime<Utc>) -> bool {
        self.published_at.is_some_and(|published| published > cutoff)
    }
}

impl fmt::Display for FeedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.guid().unwrap_or("<no id>"))?;
        if let Some(title) = &self.title {
            write!(f, " ({title:?})")?;
        }
        Ok(())
    }
}
