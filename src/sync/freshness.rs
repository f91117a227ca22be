//! Freshness gate: does a channel need to be re-processed?

use crate::channel::Channel;
use crate::feed::ParsedFeed;

/// Decide whether `channel` must be synchronized against `feed`.
///
/// When either side lacks a build time the answer is always yes.
/// Otherwise the channel needs an update only if its recorded build date
/// is strictly older than the feed's.
pub fn needs_update(channel: &Channel, feed: &ParsedFeed) -> bool {
    match (channel.last_build_date, feed.last_built) {
        (Some(recorded), Some(built)) => recorded < built,
        _ => true,
    }
}
