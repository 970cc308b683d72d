//! No-op source for graceful degradation

use super::traits::SubtitleSource;
use crate::types::{ChannelId, VideoId, VideoMetadata};
use async_trait::async_trait;
use std::path::Path;

/// Source used when no external binary is available
///
/// Every operation returns `Error::NotSupported`. A download cycle run with
/// this source enumerates nothing, and an export run writes every row with
/// empty metadata.
///
/// # Examples
///
/// ```
/// use subtitle_dl::source::{NoOpSource, SubtitleSource};
/// use subtitle_dl::types::VideoId;
///
/// # #[tokio::main]
/// # async fn main() {
/// let source = NoOpSource;
/// assert!(source.fetch_metadata(&VideoId::from("abc")).await.is_err());
/// # }
/// ```
pub struct NoOpSource;

const MISSING_BINARY: &str = "requires the yt-dlp or youtube-dl binary. \
     Configure tool_path in config or ensure yt-dlp is in PATH.";

#[async_trait]
impl SubtitleSource for NoOpSource {
    async fn enumerate_videos(
        &self,
        _channel: &ChannelId,
        _limit: usize,
    ) -> crate::Result<Vec<VideoId>> {
        Err(crate::Error::NotSupported(format!(
            "video enumeration {MISSING_BINARY}"
        )))
    }

    async fn fetch_subtitle(
        &self,
        _video: &VideoId,
        _staging_dir: &Path,
        _language: &str,
    ) -> crate::Result<()> {
        Err(crate::Error::NotSupported(format!(
            "subtitle download {MISSING_BINARY}"
        )))
    }

    async fn fetch_metadata(&self, _video: &VideoId) -> crate::Result<VideoMetadata> {
        Err(crate::Error::NotSupported(format!(
            "metadata lookup {MISSING_BINARY}"
        )))
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
