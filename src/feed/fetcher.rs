//! Feed retrieval and parsing.
//!
//! Fetches RSS/Atom documents over HTTP with resource limits and turns
//! them into [`ParsedFeed`] values.

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use feed_rs::model::{Entry, Feed};
use feed_rs::parser;
use reqwest::Client;
use tracing::debug;

use crate::config::FetchConfig;
use crate::feed::content::sanitize_text;
use crate::feed::types::{EntryMedia, FeedEntry, MediaKind, ParsedFeed};
use crate::{FeedSyncError, Result};

/// Source of parsed feeds for a channel URL.
pub trait FeedSource: Sync {
    /// Retrieve and parse the feed published at `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<ParsedFeed>> + Send;
}

/// HTTP feed source with security measures.
pub struct HttpFeedSource {
    client: Client,
    max_feed_size: u64,
    allow_private_hosts: bool,
}

impl HttpFeedSource {
    /// Create a source from the fetch configuration.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(Duration::from_secs(config.read_timeout_secs))
            .timeout(Duration::from_secs(config.total_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| FeedSyncError::Feed(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_feed_size: config.max_feed_size_bytes,
            allow_private_hosts: config.allow_private_hosts,
        })
    }

    fn check_size(&self, size: u64) -> Result<()> {
        if size > self.max_feed_size {
            return Err(FeedSyncError::Feed(format!(
                "feed too large: {} bytes (max {} bytes)",
                size, self.max_feed_size
            )));
        }
        Ok(())
    }
}

impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        validate_url(url, self.allow_private_hosts)?;
        debug!("Fetching feed {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedSyncError::Feed(format!("failed to fetch feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FeedSyncError::Feed(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        if let Some(content_length) = response.content_length() {
            self.check_size(content_length)?;
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FeedSyncError::Feed(format!("failed to read response: {}", e)))?;
        self.check_size(bytes.len() as u64)?;

        parse_feed(&bytes)
    }
}

/// Validate a channel URL before fetching it.
///
/// Only http and https are accepted. Loopback, private, link-local and
/// unspecified addresses, and `localhost`-style names, are rejected
/// unless `allow_private_hosts` is set.
pub fn validate_url(url: &str, allow_private_hosts: bool) -> Result<()> {
    let parsed =
        url::Url::parse(url).map_err(|e| FeedSyncError::Feed(format!("invalid URL: {}", e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(FeedSyncError::Feed(format!(
                "unsupported URL scheme: {}",
                scheme
            )));
        }
    }

    let host = parsed
        .host()
        .ok_or_else(|| FeedSyncError::Feed("URL has no host".to_string()))?;

    if allow_private_hosts {
        return Ok(());
    }

    let forbidden = match host {
        url::Host::Domain(domain) => is_local_hostname(domain),
        url::Host::Ipv4(ip) => is_private_ip(&IpAddr::V4(ip)),
        url::Host::Ipv6(ip) => is_private_ip(&IpAddr::V6(ip)),
    };
    if forbidden {
        return Err(FeedSyncError::Feed(format!("forbidden host: {}", host)));
    }

    Ok(())
}

fn is_local_hostname(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    host == "localhost"
        || [".localhost", ".local", ".internal", ".lan"]
            .iter()
            .any(|suffix| host.ends_with(suffix))
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            let first = v6.segments()[0];
            v6.is_loopback()
                || v6.is_unspecified()
                // Unique local fc00::/7
                || (first & 0xfe00) == 0xfc00
                // Link-local fe80::/10
                || (first & 0xffc0) == 0xfe80
        }
    }
}

/// Parse feed bytes (RSS, Atom or JSON Feed) into a [`ParsedFeed`].
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed> {
    // A missing <guid> stays blank so the entry falls back to its link
    let feed: Feed = parser::Builder::new()
        .id_generator(|_, _, _| String::new())
        .build()
        .parse(bytes)
        .map_err(|e| FeedSyncError::Feed(format!("failed to parse feed: {}", e)))?;

    Ok(ParsedFeed {
        title: feed.title.map(|t| sanitize_text(&t.content)),
        // RSS lastBuildDate and Atom <updated> both land here
        last_built: feed.updated,
        entries: feed.entries.into_iter().map(convert_entry).collect(),
    })
}

fn convert_entry(entry: Entry) -> FeedEntry {
    let url = entry
        .links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone());

    let mut media = Vec::new();
    for object in &entry.media {
        for thumbnail in &object.thumbnails {
            media.push(EntryMedia::new(MediaKind::Thumbnail, thumbnail.image.uri.clone()));
        }
        for content in &object.content {
            if let Some(content_url) = &content.url {
                let mut item = EntryMedia::new(MediaKind::Content, content_url.as_str());
                if let Some(content_type) = &content.content_type {
                    item = item.with_media_type(content_type.to_string());
                }
                media.push(item);
            }
        }
    }
    for link in &entry.links {
        if link
            .rel
            .as_deref()
            .is_some_and(|rel| rel.eq_ignore_ascii_case("enclosure"))
        {
            let mut item = EntryMedia::new(MediaKind::Enclosure, link.href.clone());
            if let Some(media_type) = &link.media_type {
                item = item.with_media_type(media_type.clone());
            }
            media.push(item);
        }
    }

    FeedEntry {
        entry_id: Some(entry.id).filter(|id| !id.trim().is_empty()),
        url,
        title: entry.title.map(|t| t.content),
        summary: entry.summary.map(|t| t.content),
        content: entry.content.and_then(|c| c.body),
        published_at: entry.published.or(entry.updated),
        media,
    }
}
