//! Subtitle acquisition for a single video

use crate::config::Config;
use crate::error::FetchError;
use crate::sanitize::sanitize;
use crate::source::SubtitleSource;
use crate::types::VideoId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Extension preferred when several staged tracks match
const PREFERRED_EXTENSION: &str = "vtt";

/// Fetches, locates, reads and sanitizes the subtitle of one video
///
/// Staged files are named `<video>.<language>.<ext>` inside the staging
/// directory, so concurrent workers never touch each other's files.
pub struct SubtitleFetcher {
    source: Arc<dyn SubtitleSource>,
    staging_dir: PathBuf,
    language: String,
    keep_staged: bool,
}

impl SubtitleFetcher {
    /// Create a fetcher using the staging settings from `config`
    pub fn new(source: Arc<dyn SubtitleSource>, config: &Config) -> Self {
        Self {
            source,
            staging_dir: config.paths.staging_dir.clone(),
            language: config.fetch.language.clone(),
            keep_staged: config.fetch.keep_staged_files,
        }
    }

    /// Fetch and sanitize the subtitle of `video`
    ///
    /// # Errors
    ///
    /// - [`FetchError::ToolFailed`] when staging fails or the source errors
    /// - [`FetchError::ArtifactNotFound`] when nothing was staged, which
    ///   includes videos without a track in the requested language
    /// - [`FetchError::ReadFailed`] when the staged file cannot be read
    pub async fn fetch(&self, video: &VideoId) -> Result<String, FetchError> {
        info!(video = %video, "downloading subtitle");

        tokio::fs::create_dir_all(&self.staging_dir)
            .await
            .map_err(|e| FetchError::ToolFailed {
                video: video.to_string(),
                reason: format!(
                    "cannot create staging directory {}: {}",
                    self.staging_dir.display(),
                    e
                ),
            })?;

        self.source
            .fetch_subtitle(video, &self.staging_dir, &self.language)
            .await
            .map_err(|e| FetchError::ToolFailed {
                video: video.to_string(),
                reason: e.to_string(),
            })?;

        let staged = locate_staged_artifacts(&self.staging_dir, video, &self.language).await?;
        let artifact = pick_artifact(&staged);

        let read = tokio::fs::read(artifact).await;

        if !self.keep_staged {
            remove_staged(&staged).await;
        }

        let bytes = read.map_err(|e| FetchError::ReadFailed {
            path: artifact.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(sanitize(&String::from_utf8_lossy(&bytes)))
    }
}

/// Glob-equivalent of `<staging>/<video>.<language>.*`
///
/// Returns matches sorted by file name; never returns an empty list.
pub(crate) async fn locate_staged_artifacts(
    staging_dir: &Path,
    video: &VideoId,
    language: &str,
) -> Result<Vec<PathBuf>, FetchError> {
    let prefix = format!("{}.{}.", video, language);
    let not_found = || FetchError::ArtifactNotFound {
        video: video.to_string(),
        pattern: staging_dir.join(format!("{prefix}*")).display().to_string(),
    };

    let mut entries = match tokio::fs::read_dir(staging_dir).await {
        Ok(entries) => entries,
        Err(_) => return Err(not_found()),
    };

    let mut matches = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(&prefix) && name.len() > prefix.len() {
            matches.push(entry.path());
        }
    }

    if matches.is_empty() {
        return Err(not_found());
    }
    matches.sort();
    Ok(matches)
}

fn pick_artifact(staged: &[PathBuf]) -> &Path {
    staged
        .iter()
        .find(|p| p.extension().is_some_and(|ext| ext == PREFERRED_EXTENSION))
        .map(PathBuf::as_path)
        .unwrap_or(staged[0].as_path())
}

async fn remove_staged(staged: &[PathBuf]) {
    for path in staged {
        if let Err(e) = tokio::fs::remove_file(path).await {
            debug!(path = %path.display(), error = %e, "failed to remove staged file");
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_helpers::{FakeSource, test_config};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_sanitizes_staged_file() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let source = Arc::new(FakeSource::new().channel("C", &["v1"]));
        let fetcher = SubtitleFetcher::new(source, &config);

        let text = fetcher.fetch(&VideoId::from("v1")).await.unwrap();
        assert_eq!(text, "transcript of v1 second line");
        // staged files are kept by default
        assert!(config.staging_dir().join("v1.en.vtt").exists());
    }

    #[tokio::test]
    async fn test_fetch_removes_staged_files_when_configured() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(dir.path());
        config.fetch.keep_staged_files = false;
        let source = Arc::new(FakeSource::new().channel("C", &["v1"]));
        let fetcher = SubtitleFetcher::new(source, &config);

        fetcher.fetch(&VideoId::from("v1")).await.unwrap();
        assert!(!config.staging_dir().join("v1.en.vtt").exists());
    }

    #[tokio::test]
    async fn test_missing_artifact_is_not_found() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let source = Arc::new(FakeSource::new().channel("C", &["quiet"]).silent_video("quiet"));
        let fetcher = SubtitleFetcher::new(source, &config);

        match fetcher.fetch(&VideoId::from("quiet")).await {
            Err(FetchError::ArtifactNotFound { video, pattern }) => {
                assert_eq!(video, "quiet");
                assert!(pattern.ends_with("quiet.en.*"));
            }
            other => panic!("Expected ArtifactNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_source_error_is_tool_failed() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let source = Arc::new(FakeSource::new().channel("C", &["bad"]).failing_video("bad"));
        let fetcher = SubtitleFetcher::new(source, &config);

        match fetcher.fetch(&VideoId::from("bad")).await {
            Err(FetchError::ToolFailed { video, reason }) => {
                assert_eq!(video, "bad");
                assert!(reason.contains("Video unavailable"));
            }
            other => panic!("Expected ToolFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_locate_ignores_other_videos_and_languages() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("v1.de.vtt"), "x").unwrap();
        std::fs::write(dir.path().join("v10.en.vtt"), "x").unwrap();
        std::fs::write(dir.path().join("v1.en.srv3"), "x").unwrap();
        std::fs::write(dir.path().join("v1.en.vtt"), "x").unwrap();

        let found = locate_staged_artifacts(dir.path(), &VideoId::from("v1"), "en")
            .await
            .unwrap();
        assert_eq!(found, vec![
            dir.path().join("v1.en.srv3"),
            dir.path().join("v1.en.vtt")
        ]);
        assert_eq!(pick_artifact(&found), dir.path().join("v1.en.vtt"));
    }

    #[tokio::test]
    async fn test_locate_in_missing_staging_dir() {
        let dir = TempDir::new().unwrap();
        let result =
            locate_staged_artifacts(&dir.path().join("missing"), &VideoId::from("v"), "en").await;
        assert!(matches!(result, Err(FetchError::ArtifactNotFound { .. })));
    }
}
