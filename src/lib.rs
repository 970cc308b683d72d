//! # subtitle-dl
//!
//! Batch downloader for the subtitle transcripts of a list of channels.
//!
//! ## Design Philosophy
//!
//! subtitle-dl is designed to be:
//! - **Concurrent per channel** - One task per channel, videos in order within it
//! - **Resumable** - A persisted `<channel>/<video>.txt` means the video is done
//! - **Failure tolerant** - A failed video is logged and skipped, never fatal
//! - **Source agnostic** - The external tool sits behind [`SubtitleSource`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use subtitle_dl::{Config, Harvester, source};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let harvester = Harvester::new(config.clone(), source::from_config(&config.fetch)).await?;
//!
//!     // Subscribe to events
//!     let mut events = harvester.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     harvester.download_all().await;
//!     harvester.export().await?;
//!     harvester.shutdown().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Channel list loading
pub mod channels;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// CSV export of persisted subtitles
pub mod export;
/// Clearing persisted state
pub mod maintenance;
/// Concurrent fetch-and-sanitize pipeline
pub mod pipeline;
/// WebVTT sanitizing
pub mod sanitize;
/// External subtitle source abstraction
pub mod source;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use config::{Config, FetchConfig, PathsConfig};
pub use error::{Error, FetchError, Result};
pub use pipeline::Harvester;
pub use source::{NoOpSource, SubtitleSource, YtDlpSource};
pub use types::{
    ChannelId, ChannelReport, Event, ExportRow, ExportSummary, FailureRecord, RunSummary, VideoId,
    VideoMetadata,
};
