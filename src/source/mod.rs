//! External subtitle and metadata source
//!
//! Everything the harvester needs from the outside world goes through the
//! [`SubtitleSource`] trait: listing a channel's videos, staging a raw
//! subtitle file for a video, and resolving a video's title and description.
//!
//! ## Implementations
//!
//! - [`YtDlpSource`]: drives an external `yt-dlp` (or `youtube-dl`) binary
//! - [`NoOpSource`]: used when no binary is available; every call fails with
//!   `Error::NotSupported` so a run degrades instead of aborting
//!
//! ## Usage
//!
//! ```no_run
//! use subtitle_dl::source::{SubtitleSource, YtDlpSource};
//! use subtitle_dl::types::ChannelId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = YtDlpSource::from_path().expect("yt-dlp not found");
//!
//!     let videos = source
//!         .enumerate_videos(&ChannelId::from("UC_x5XG1OV2P6uZZ5FSM9Ttw"), 5)
//!         .await?;
//!     for video in &videos {
//!         let meta = source.fetch_metadata(video).await?;
//!         println!("{video}: {}", meta.title);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod noop;
mod traits;
mod ytdlp;

pub use noop::NoOpSource;
pub use traits::SubtitleSource;
pub use ytdlp::YtDlpSource;

use crate::config::FetchConfig;
use std::sync::Arc;

/// Pick the source for a run from configuration
///
/// Uses the explicit `tool_path` when set, otherwise searches PATH (when
/// allowed). Falls back to [`NoOpSource`] with a warning when no binary is
/// found.
pub fn from_config(config: &FetchConfig) -> Arc<dyn SubtitleSource> {
    let found = match &config.tool_path {
        Some(path) => Some(YtDlpSource::new(path.clone())),
        None if config.search_path => YtDlpSource::from_path(),
        None => None,
    };

    match found {
        Some(source) => {
            tracing::info!(binary = %source.binary_path().display(), "using external subtitle source");
            Arc::new(source.with_url_bases(&config.channel_url_base, &config.video_url_base))
        }
        None => {
            tracing::warn!(
                "no yt-dlp or youtube-dl binary available; every fetch will fail. \
                 Set tool_path in config or install yt-dlp in PATH."
            );
            Arc::new(NoOpSource)
        }
    }
}
