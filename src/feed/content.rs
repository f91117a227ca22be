//! Derived fields computed from feed entries.
//!
//! Plain-text descriptions and the representative image of an entry.

use scraper::{Html, Selector};
use url::Url;

use crate::feed::types::{FeedEntry, MediaKind};
use crate::{FeedSyncError, Result};

/// Longest entity name (between `&` and `;`) worth decoding.
const MAX_ENTITY_LEN: usize = 10;

/// Reduce an HTML fragment to plain text.
///
/// Tags are removed, common and numeric entities decoded, and runs of
/// whitespace collapsed to a single space.
pub fn sanitize_text(html: &str) -> String {
    let mut stripped = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                // Adjacent block elements would otherwise glue words together
                stripped.push(' ');
            }
            _ if !in_tag => stripped.push(ch),
            _ => {}
        }
    }

    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .and_then(|end| decode_entity(&after[..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Pick the image that best represents an entry.
///
/// Candidates, in order: media thumbnails, image-typed media contents and
/// enclosures, then the first `<img>` in the content or summary. Relative
/// URLs are resolved against the entry URL and candidates with a scheme
/// other than http(s) are ignored.
///
/// # Errors
///
/// Returns a validation error when a candidate URL is malformed or
/// cannot be resolved.
pub fn derive_image_url(entry: &FeedEntry) -> Result<Option<String>> {
    let thumbnails = entry
        .media
        .iter()
        .filter(|m| m.kind == MediaKind::Thumbnail);
    let typed_images = entry
        .media
        .iter()
        .filter(|m| m.kind != MediaKind::Thumbnail && m.is_image());

    for media in thumbnails.chain(typed_images) {
        if let Some(url) = resolve_image_url(&media.url, entry.url.as_deref())? {
            return Ok(Some(url));
        }
    }

    let inline_images = [entry.content.as_deref(), entry.summary.as_deref()]
        .into_iter()
        .flatten()
        .filter_map(find_img_src);

    for candidate in inline_images {
        if let Some(url) = resolve_image_url(&candidate, entry.url.as_deref())? {
            return Ok(Some(url));
        }
    }

    Ok(None)
}

fn resolve_image_url(candidate: &str, base: Option<&str>) -> Result<Option<String>> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return Ok(None);
    }

    let url = match Url::parse(candidate) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| {
                FeedSyncError::Validation(format!(
                    "relative image url {candidate:?} on an entry without url"
                ))
            })?;
            let base = Url::parse(base).map_err(|e| {
                FeedSyncError::Validation(format!("malformed entry url {base:?}: {e}"))
            })?;
            base.join(candidate).map_err(|e| {
                FeedSyncError::Validation(format!("malformed image url {candidate:?}: {e}"))
            })?
        }
        Err(e) => {
            return Err(FeedSyncError::Validation(format!(
                "malformed image url {candidate:?}: {e}"
            )));
        }
    };

    match url.scheme() {
        "http" | "https" => Ok(Some(url.to_string())),
        _ => Ok(None),
    }
}

/// Find the `src` of the first `<img>` in an HTML fragment.
fn find_img_src(html: &str) -> Option<String> {
    let selector = Selector::parse("img[src]").ok()?;
    let fragment = Html::parse_fragment(html);

    fragment
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .find(|src| !src.is_empty())
        .map(str::to_string)
}
