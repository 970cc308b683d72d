//! Common test utilities for subtitle-dl integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use subtitle_dl::{ChannelId, Config, SubtitleSource, VideoId, VideoMetadata};
use tempfile::TempDir;

/// Workspace with every configured path inside a temp dir
pub struct Workspace {
    pub dir: TempDir,
    pub config: Config,
}

impl Workspace {
    pub fn new(channels: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let mut config = Config::default();
        config.paths.channels_file = root.join("channels.txt");
        config.paths.subtitles_dir = root.join("subtitles");
        config.paths.staging_dir = root.join("tmp");
        config.paths.error_log = root.join("download_errors.log");
        config.paths.export_file = root.join("output.csv");

        let mut content = channels.join("\n");
        content.push('\n');
        std::fs::write(&config.paths.channels_file, content).unwrap();

        Self { dir, config }
    }

    pub fn subtitle(&self, channel: &str, video: &str) -> std::path::PathBuf {
        self.config
            .paths
            .subtitles_dir
            .join(channel)
            .join(format!("{video}.txt"))
    }

    pub fn error_log_lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.config.paths.error_log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

/// Scripted source that records which videos it was asked to fetch
#[derive(Default)]
pub struct ScriptedSource {
    channels: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    titles: HashMap<String, (String, String)>,
    fetch_count: AtomicUsize,
    fetched: Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn channel(mut self, channel: &str, videos: &[&str]) -> Self {
        self.channels.insert(
            channel.to_string(),
            videos.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn failing(mut self, video: &str) -> Self {
        self.failing.insert(video.to_string());
        self
    }

    pub fn titled(mut self, video: &str, title: &str, description: &str) -> Self {
        self.titles
            .insert(video.to_string(), (title.to_string(), description.to_string()));
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubtitleSource for ScriptedSource {
    async fn enumerate_videos(
        &self,
        channel: &ChannelId,
        limit: usize,
    ) -> subtitle_dl::Result<Vec<VideoId>> {
        Ok(self
            .channels
            .get(channel.as_str())
            .into_iter()
            .flatten()
            .take(limit)
            .map(|v| VideoId::from(v.as_str()))
            .collect())
    }

    async fn fetch_subtitle(
        &self,
        video: &VideoId,
        staging_dir: &Path,
        language: &str,
    ) -> subtitle_dl::Result<()> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        self.fetched.lock().unwrap().push(video.to_string());
        if self.failing.contains(video.as_str()) {
            return Err(subtitle_dl::Error::ExternalTool(format!(
                "ERROR: [youtube] {video}: Private video"
            )));
        }
        let body = format!(
            "WEBVTT\nKind: captions\nLanguage: {language}\n\n\
             00:00:00.000 --> 00:00:02.000 align:start position:0%\n\
             words<00:00:00.500><c> from</c><00:00:01.000><c> {video}</c>\n"
        );
        tokio::fs::write(staging_dir.join(format!("{video}.{language}.vtt")), body).await?;
        Ok(())
    }

    async fn fetch_metadata(&self, video: &VideoId) -> subtitle_dl::Result<VideoMetadata> {
        match self.titles.get(video.as_str()) {
            Some((title, description)) => Ok(VideoMetadata {
                title: title.clone(),
                description: description.clone(),
                filename: None,
            }),
            None => Err(subtitle_dl::Error::ExternalTool(
                "incomplete metadata received".to_string(),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
