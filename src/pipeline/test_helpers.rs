//! Shared test helpers: an in-memory subtitle source and isolated configs.

use crate::config::Config;
use crate::source::SubtitleSource;
use crate::types::{ChannelId, VideoId, VideoMetadata};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Config whose every path lives under `root`
pub(crate) fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.paths.channels_file = root.join("channels.txt");
    config.paths.subtitles_dir = root.join("subtitles");
    config.paths.staging_dir = root.join("tmp");
    config.paths.error_log = root.join("download_errors.log");
    config.paths.export_file = root.join("output.csv");
    config
}

/// Write a channels file under the config's path
pub(crate) fn write_channels(config: &Config, channels: &[&str]) {
    let mut content = channels.join("\n");
    content.push('\n');
    std::fs::write(&config.paths.channels_file, content).unwrap();
}

/// Raw WebVTT the fake source stages for `video`
pub(crate) fn fake_vtt(video: &str) -> String {
    format!(
        "WEBVTT\nKind: captions\nLanguage: en\n\n\
         00:00:00.000 --> 00:00:01.500 align:start position:0%\n\
         <c>transcript</c><00:00:00.700><c> of {video}</c>\n\n\
         00:00:01.500 --> 00:00:03.000\n\
         second line\n"
    )
}

/// In-memory [`SubtitleSource`] with scripted failures and call counters
#[derive(Default)]
pub(crate) struct FakeSource {
    channels: HashMap<String, Vec<String>>,
    failing_channels: HashSet<String>,
    failing_videos: HashSet<String>,
    silent_videos: HashSet<String>,
    metadata: HashMap<String, VideoMetadata>,
    pub(crate) enumerate_calls: AtomicUsize,
    pub(crate) fetch_calls: AtomicUsize,
    pub(crate) metadata_calls: AtomicUsize,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Channel listing `videos`
    pub(crate) fn channel(mut self, channel: &str, videos: &[&str]) -> Self {
        self.channels.insert(
            channel.to_string(),
            videos.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    /// Channel whose enumeration errors
    pub(crate) fn failing_channel(mut self, channel: &str) -> Self {
        self.failing_channels.insert(channel.to_string());
        self
    }

    /// Video whose subtitle download errors
    pub(crate) fn failing_video(mut self, video: &str) -> Self {
        self.failing_videos.insert(video.to_string());
        self
    }

    /// Video whose download succeeds but stages no file
    pub(crate) fn silent_video(mut self, video: &str) -> Self {
        self.silent_videos.insert(video.to_string());
        self
    }

    /// Video with resolvable metadata; all others fail lookup
    pub(crate) fn metadata(mut self, video: &str, title: &str, description: &str) -> Self {
        self.metadata.insert(
            video.to_string(),
            VideoMetadata {
                title: title.to_string(),
                description: description.to_string(),
                filename: None,
            },
        );
        self
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubtitleSource for FakeSource {
    async fn enumerate_videos(
        &self,
        channel: &ChannelId,
        limit: usize,
    ) -> crate::Result<Vec<VideoId>> {
        self.enumerate_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_channels.contains(channel.as_str()) {
            return Err(crate::Error::ExternalTool(format!(
                "ERROR: channel {channel} does not exist"
            )));
        }
        Ok(self
            .channels
            .get(channel.as_str())
            .map(|videos| {
                videos
                    .iter()
                    .take(limit)
                    .map(|v| VideoId::from(v.as_str()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn fetch_subtitle(
        &self,
        video: &VideoId,
        staging_dir: &Path,
        language: &str,
    ) -> crate::Result<()> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_videos.contains(video.as_str()) {
            return Err(crate::Error::ExternalTool(format!(
                "ERROR: [youtube] {video}: Video unavailable"
            )));
        }
        if self.silent_videos.contains(video.as_str()) {
            return Ok(());
        }
        let path = staging_dir.join(format!("{video}.{language}.vtt"));
        tokio::fs::write(path, fake_vtt(video.as_str())).await?;
        Ok(())
    }

    async fn fetch_metadata(&self, video: &VideoId) -> crate::Result<VideoMetadata> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.metadata
            .get(video.as_str())
            .cloned()
            .ok_or_else(|| crate::Error::ExternalTool(format!("no metadata for {video}")))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}
