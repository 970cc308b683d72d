//! Soft-failing channel enumeration

use crate::config::DEFAULT_VIDEO_COUNT;
use crate::source::SubtitleSource;
use crate::types::{ChannelId, VideoId};
use tracing::{info, warn};

/// Resolve up to `count` videos of a channel
///
/// `None` or zero falls back to [`DEFAULT_VIDEO_COUNT`]. Any source failure
/// is logged as a warning and yields an empty list, so one bad channel never
/// affects the others.
pub async fn enumerate_videos(
    source: &dyn SubtitleSource,
    channel: &ChannelId,
    count: Option<usize>,
) -> Vec<VideoId> {
    let limit = count.filter(|n| *n > 0).unwrap_or(DEFAULT_VIDEO_COUNT);
    info!(channel = %channel, limit, source = source.name(), "fetching video IDs");

    match source.enumerate_videos(channel, limit).await {
        Ok(mut videos) => {
            videos.truncate(limit);
            info!(channel = %channel, count = videos.len(), "fetched video IDs");
            videos
        }
        Err(e) => {
            warn!(channel = %channel, error = %e, "failed to enumerate channel videos");
            Vec::new()
        }
    }
}
