//! Core types for subtitle-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Opaque identifier of a content channel
    ChannelId
);

string_id!(
    /// Opaque identifier of a single video, scoped to one channel
    VideoId
);

/// Metadata resolved for a video by the external source
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video title
    pub title: String,
    /// Video description (may span several lines)
    pub description: String,
    /// Canonical output filename the source would use, when reported
    pub filename: Option<String>,
}

/// One failed fetch, as written to the failure log
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureRecord {
    /// Channel the video belongs to
    pub channel: ChannelId,
    /// Video that failed
    pub video: VideoId,
    /// Human-readable error message
    pub error: String,
}

impl FailureRecord {
    /// Render the record as a single log line (without trailing newline)
    ///
    /// Embedded line breaks in the message are flattened so every record
    /// stays on exactly one line.
    pub fn to_line(&self) -> String {
        let error = self
            .error
            .split(['\r', '\n'])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "Channel ID: {}, Video ID: {}, Error: {}",
            self.channel, self.video, error
        )
    }
}

/// One row of the tabular export
///
/// Field order is the column order of the export file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// Video identifier (file stem)
    pub video_id: String,
    /// Title, empty when metadata lookup failed
    pub title: String,
    /// Channel identifier (parent directory name)
    pub channel_id: String,
    /// Description, empty when metadata lookup failed
    pub description: String,
    /// Flattened subtitle text
    pub subtitle: String,
}

/// Why a channel worker stopped before fetching anything
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelSkipReason {
    /// Enumeration returned no videos (or failed)
    NoVideos,
    /// Every enumerated video already has a persisted subtitle
    AllDownloaded,
}

/// Outcome of one channel worker
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChannelReport {
    /// Channel processed by the worker
    pub channel: ChannelId,
    /// Videos returned by enumeration
    pub enumerated: usize,
    /// Videos skipped because a subtitle was already persisted
    pub skipped: usize,
    /// Subtitles fetched and persisted during this run
    pub saved: usize,
    /// Videos recorded in the failure log
    pub failed: usize,
}

/// Aggregate result of one download cycle
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Channels read from the channel source
    pub channels: usize,
    /// Reports of workers that ran to completion
    pub reports: Vec<ChannelReport>,
    /// Workers that panicked or were cancelled
    pub crashed_workers: usize,
    /// The subtitles directory did not exist after the run
    pub nothing_downloaded: bool,
}

impl RunSummary {
    /// Subtitles persisted across all channels
    pub fn total_saved(&self) -> usize {
        self.reports.iter().map(|r| r.saved).sum()
    }

    /// Videos skipped across all channels
    pub fn total_skipped(&self) -> usize {
        self.reports.iter().map(|r| r.skipped).sum()
    }

    /// Failed videos across all channels
    pub fn total_failed(&self) -> usize {
        self.reports.iter().map(|r| r.failed).sum()
    }
}

/// Result of an export run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    /// Data rows written (header excluded)
    pub rows: usize,
    /// Rows written with empty title/description because lookup failed
    pub metadata_failures: usize,
    /// Subtitle files that could not be read and produced no row
    pub unreadable: usize,
}

/// Progress events emitted by the harvester
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A channel worker started
    ChannelStarted {
        /// Channel identifier
        channel: ChannelId,
    },
    /// A channel worker stopped early
    ChannelSkipped {
        /// Channel identifier
        channel: ChannelId,
        /// Why the worker stopped
        reason: ChannelSkipReason,
    },
    /// A video already had a persisted subtitle
    VideoSkipped {
        /// Channel identifier
        channel: ChannelId,
        /// Video identifier
        video: VideoId,
    },
    /// A subtitle was fetched and persisted
    VideoSaved {
        /// Channel identifier
        channel: ChannelId,
        /// Video identifier
        video: VideoId,
        /// Where the sanitized subtitle was written
        path: PathBuf,
    },
    /// A video failed and was recorded in the failure log
    VideoFailed {
        /// Channel identifier
        channel: ChannelId,
        /// Video identifier
        video: VideoId,
        /// Error message
        error: String,
    },
    /// A channel worker finished
    ChannelFinished {
        /// Final report of the worker
        report: ChannelReport,
    },
}
