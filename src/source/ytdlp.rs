//! CLI-based source using an external yt-dlp / youtube-dl binary

use super::traits::SubtitleSource;
use crate::types::{ChannelId, VideoId, VideoMetadata};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

/// Binary names searched in PATH, in order of preference
const BINARY_CANDIDATES: [&str; 2] = ["yt-dlp", "youtube-dl"];

const DEFAULT_CHANNEL_URL_BASE: &str = "https://www.youtube.com/channel/";
const DEFAULT_VIDEO_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// Source that shells out to `yt-dlp` (or the older `youtube-dl`)
///
/// # Examples
///
/// ```no_run
/// use subtitle_dl::source::{SubtitleSource, YtDlpSource};
/// use subtitle_dl::types::VideoId;
/// use std::path::{Path, PathBuf};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Create with explicit path
/// let source = YtDlpSource::new(PathBuf::from("/usr/local/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let source = YtDlpSource::from_path().expect("yt-dlp not found in PATH");
///
/// source
///     .fetch_subtitle(&VideoId::from("dQw4w9WgXcQ"), Path::new("tmp"), "en")
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct YtDlpSource {
    binary_path: PathBuf,
    channel_url_base: String,
    video_url_base: String,
}

/// Subset of the `--dump-json` document we care about
#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "_filename")]
    legacy_filename: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

impl YtDlpSource {
    /// Create a source with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self {
            binary_path,
            channel_url_base: DEFAULT_CHANNEL_URL_BASE.to_string(),
            video_url_base: DEFAULT_VIDEO_URL_BASE.to_string(),
        }
    }

    /// Attempt to find `yt-dlp`, then `youtube-dl`, in PATH
    pub fn from_path() -> Option<Self> {
        BINARY_CANDIDATES
            .iter()
            .find_map(|name| which::which(name).ok())
            .map(Self::new)
    }

    /// Override the URL prefixes channel and video identifiers are appended to
    #[must_use]
    pub fn with_url_bases(mut self, channel_url_base: &str, video_url_base: &str) -> Self {
        self.channel_url_base = channel_url_base.to_string();
        self.video_url_base = video_url_base.to_string();
        self
    }

    /// Path of the binary this source executes
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    fn channel_url(&self, channel: &ChannelId) -> String {
        format!("{}{}", self.channel_url_base, channel)
    }

    fn video_url(&self, video: &VideoId) -> String {
        format!("{}{}", self.video_url_base, video)
    }

    async fn run(&self, command: &mut Command) -> crate::Result<Output> {
        let output = command.output().await.map_err(|e| {
            crate::Error::ExternalTool(format!(
                "Failed to execute {}: {}",
                self.binary_path.display(),
                e
            ))
        })?;

        if !output.status.success() {
            return Err(crate::Error::ExternalTool(format!(
                "{} exited with {}: {}",
                self.binary_path.display(),
                output.status,
                stderr_summary(&output.stderr)
            )));
        }

        Ok(output)
    }
}

#[async_trait]
impl SubtitleSource for YtDlpSource {
    async fn enumerate_videos(
        &self,
        channel: &ChannelId,
        limit: usize,
    ) -> crate::Result<Vec<VideoId>> {
        let output = self
            .run(
                Command::new(&self.binary_path)
                    .arg("--flat-playlist")
                    .arg("--get-id")
                    .arg("--playlist-end")
                    .arg(limit.to_string())
                    .arg(self.channel_url(channel)),
            )
            .await?;

        let mut ids = parse_video_ids(&output.stdout);
        ids.truncate(limit);
        Ok(ids)
    }

    async fn fetch_subtitle(
        &self,
        video: &VideoId,
        staging_dir: &Path,
        language: &str,
    ) -> crate::Result<()> {
        self.run(
            Command::new(&self.binary_path)
                .arg("--write-sub") // human-authored track
                .arg("--write-auto-sub") // auto-generated fallback
                .arg("--sub-lang")
                .arg(language)
                .arg("--sub-format")
                .arg("vtt/best")
                .arg("--skip-download")
                .arg("-o")
                .arg(staging_dir.join("%(id)s.%(ext)s"))
                .arg(self.video_url(video)),
        )
        .await?;
        Ok(())
    }

    async fn fetch_metadata(&self, video: &VideoId) -> crate::Result<VideoMetadata> {
        let output = self
            .run(
                Command::new(&self.binary_path)
                    .arg("--dump-json")
                    .arg("--skip-download")
                    .arg(self.video_url(video)),
            )
            .await?;

        parse_metadata(&output.stdout)
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}

/// One identifier per non-empty stdout line
fn parse_video_ids(stdout: &[u8]) -> Vec<VideoId> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(VideoId::from)
        .collect()
}

/// Parse the first JSON document printed by `--dump-json`
fn parse_metadata(stdout: &[u8]) -> crate::Result<VideoMetadata> {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| crate::Error::ExternalTool("incomplete metadata received".into()))?;

    let raw: RawMetadata = serde_json::from_str(line)?;
    Ok(VideoMetadata {
        title: raw.title.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        filename: raw.legacy_filename.or(raw.filename),
    })
}

/// Last meaningful stderr line, which is where yt-dlp puts its `ERROR:` message
fn stderr_summary(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "no error output".to_string())
}
