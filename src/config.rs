//! Configuration types for subtitle-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fallback number of videos enumerated per channel when none is configured
pub const DEFAULT_VIDEO_COUNT: usize = 10;

/// On-disk locations used by a run
///
/// Groups every path the downloader and exporter read or write.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Line-oriented list of channel identifiers (default: "channels.txt")
    #[serde(default = "default_channels_file")]
    pub channels_file: PathBuf,

    /// Root of the persisted `<channel>/<video>.txt` tree (default: "subtitles")
    #[serde(default = "default_subtitles_dir")]
    pub subtitles_dir: PathBuf,

    /// Scratch directory for raw fetched artifacts (default: "tmp")
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Append-only failure log (default: "download_errors.log")
    #[serde(default = "default_error_log")]
    pub error_log: PathBuf,

    /// Tabular export target (default: "output.csv")
    #[serde(default = "default_export_file")]
    pub export_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            channels_file: default_channels_file(),
            subtitles_dir: default_subtitles_dir(),
            staging_dir: default_staging_dir(),
            error_log: default_error_log(),
            export_file: default_export_file(),
        }
    }
}

/// External source behavior
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum number of videos enumerated per channel (default: 10)
    #[serde(default = "default_video_count")]
    pub video_count: usize,

    /// Subtitle language requested from the source (default: "en")
    #[serde(default = "default_language")]
    pub language: String,

    /// Leave raw artifacts in the staging directory after they are read (default: true)
    #[serde(default = "default_true")]
    pub keep_staged_files: bool,

    /// Path to the yt-dlp / youtube-dl executable (auto-detected if None)
    #[serde(default)]
    pub tool_path: Option<PathBuf>,

    /// Whether to search PATH for the executable if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// URL prefix a channel identifier is appended to
    #[serde(default = "default_channel_url_base")]
    pub channel_url_base: String,

    /// URL prefix a video identifier is appended to
    #[serde(default = "default_video_url_base")]
    pub video_url_base: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            video_count: default_video_count(),
            language: default_language(),
            keep_staged_files: true,
            tool_path: None,
            search_path: true,
            channel_url_base: default_channel_url_base(),
            video_url_base: default_video_url_base(),
        }
    }
}

/// Main configuration for [`Harvester`](crate::Harvester)
///
/// Sub-config fields are flattened so the TOML file is a single table:
///
/// ```toml
/// channels_file = "channels.txt"
/// subtitles_dir = "subtitles"
/// video_count = 15
/// keep_staged_files = false
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Paths read and written by a run
    #[serde(flatten)]
    pub paths: PathsConfig,

    /// External source settings
    #[serde(flatten)]
    pub fetch: FetchConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing keys fall back to their defaults. The result is validated
    /// before it is returned.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("cannot read {}: {}", path.display(), e),
            key: None,
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde defaults cannot express
    pub fn validate(&self) -> Result<()> {
        if self.fetch.video_count == 0 {
            return Err(Error::config(
                "video_count must be a positive integer",
                "video_count",
            ));
        }
        if self.fetch.language.trim().is_empty() {
            return Err(Error::config("language must not be empty", "language"));
        }
        Ok(())
    }

    /// Directory holding persisted subtitles
    pub fn subtitles_dir(&self) -> &Path {
        &self.paths.subtitles_dir
    }

    /// Staging directory for raw artifacts
    pub fn staging_dir(&self) -> &Path {
        &self.paths.staging_dir
    }
}

fn default_channels_file() -> PathBuf {
    PathBuf::from("channels.txt")
}

fn default_subtitles_dir() -> PathBuf {
    PathBuf::from("subtitles")
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("tmp")
}

fn default_error_log() -> PathBuf {
    PathBuf::from("download_errors.log")
}

fn default_export_file() -> PathBuf {
    PathBuf::from("output.csv")
}

fn default_video_count() -> usize {
    DEFAULT_VIDEO_COUNT
}

fn default_language() -> String {
    "en".to_string()
}

fn default_true() -> bool {
    true
}

fn default_channel_url_base() -> String {
    "https://www.youtube.com/channel/".to_string()
}

fn default_video_url_base() -> String {
    "https://www.youtube.com/watch?v=".to_string()
}
