//! Feed retrieval, parsing and derived entry fields.

pub mod content;
pub mod fetcher;
pub mod types;

pub use content::{derive_image_url, sanitize_text};
pub use fetcher::{parse_feed, validate_url, FeedSource, HttpFeedSource};
pub use types::{EntryMedia, FeedEntry, MediaKind, ParsedFeed};
