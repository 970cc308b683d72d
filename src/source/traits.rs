//! Trait for external subtitle sources

use crate::types::{ChannelId, VideoId, VideoMetadata};
use async_trait::async_trait;
use std::path::Path;

/// Narrow interface to the external fetch/resolve collaborator
///
/// The concurrent core only talks to this trait, so it can run against the
/// real `yt-dlp` binary or against an in-memory fake in tests. Every failure
/// is recoverable: callers log it and move on.
#[async_trait]
pub trait SubtitleSource: Send + Sync {
    /// List up to `limit` video identifiers of a channel's public uploads
    ///
    /// # Errors
    ///
    /// Network failures, unknown channels and quota errors are returned as-is;
    /// the caller turns them into an empty list.
    async fn enumerate_videos(&self, channel: &ChannelId, limit: usize)
    -> crate::Result<Vec<VideoId>>;

    /// Stage the subtitle track of a video into `staging_dir`
    ///
    /// Implementations prefer a human-authored track and fall back to an
    /// auto-generated one. The staged file must be named
    /// `<video>.<language>.<ext>`; locating and reading it is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns an error when the source itself fails. A video without a
    /// track in `language` may succeed here and simply stage nothing.
    async fn fetch_subtitle(
        &self,
        video: &VideoId,
        staging_dir: &Path,
        language: &str,
    ) -> crate::Result<()>;

    /// Resolve title, description and canonical filename of a video
    async fn fetch_metadata(&self, video: &VideoId) -> crate::Result<VideoMetadata>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
