//! Error types for subtitle-dl
//!
//! Errors are split by how far they are allowed to travel:
//! - [`FetchError`] describes a single video that could not be fetched. It is
//!   recorded in the failure log and never leaves the channel worker.
//! - [`Error`] is the crate-wide type returned by configuration loading, the
//!   external source, the export compiler and the failure log.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for subtitle-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for subtitle-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "staging_dir")
        key: Option<String>,
    },

    /// Failed to parse a TOML configuration file
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Per-video fetch failure
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV export error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error (external tool JSON output)
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// External tool execution failed (yt-dlp, youtube-dl)
    #[error("external tool error: {0}")]
    ExternalTool(String),

    /// Operation not supported (missing binary)
    #[error("not supported: {0}")]
    NotSupported(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Errors raised while acquiring the subtitle of a single video
#[derive(Debug, Error)]
pub enum FetchError {
    /// The external source failed to produce a subtitle for the video
    #[error("subtitle download failed for video {video}: {reason}")]
    ToolFailed {
        /// The video whose subtitle could not be downloaded
        video: String,
        /// Error reported by the external source
        reason: String,
    },

    /// No staged artifact matched the expected naming pattern
    ///
    /// Also raised when the upstream video simply has no subtitle track in the
    /// requested language.
    #[error("no subtitle file found for video {video} matching {pattern}")]
    ArtifactNotFound {
        /// The video whose artifact is missing
        video: String,
        /// The file name pattern that was searched for
        pattern: String,
    },

    /// The staged artifact exists but could not be read as text
    #[error("failed to read subtitle file {path}: {reason}")]
    ReadFailed {
        /// Path of the staged artifact
        path: PathBuf,
        /// Underlying I/O error message
        reason: String,
    },
}

impl Error {
    /// Shorthand for a configuration error tied to a specific key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display_names_video() {
        let err = FetchError::ArtifactNotFound {
            video: "abc123".to_string(),
            pattern: "abc123.en.*".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("abc123"));
        assert!(msg.contains("abc123.en.*"));
    }

    #[test]
    fn test_fetch_error_converts_into_error() {
        let err: Error = FetchError::ToolFailed {
            video: "v1".to_string(),
            reason: "HTTP Error 404".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Fetch(FetchError::ToolFailed { .. })));
        assert!(err.to_string().starts_with("fetch error:"));
    }

    #[test]
    fn test_config_helper_sets_key() {
        match Error::config("must be positive", "video_count") {
            Error::Config { message, key } => {
                assert_eq!(message, "must be positive");
                assert_eq!(key.as_deref(), Some("video_count"));
            }
            other => panic!("Expected Config error, got {:?}", other),
        }
    }
}
