//! Persisted subtitle layout and resumability checks
//!
//! Sanitized subtitles live at `<root>/<channel>/<video>.txt`. The presence of
//! that file is the only record that a video is done; nothing is cached in
//! memory between runs.

use crate::types::{ChannelId, VideoId};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Extension of persisted subtitle files
pub const SUBTITLE_EXTENSION: &str = "txt";

/// Deterministic path of a video's persisted subtitle
pub fn subtitle_path(root: &Path, channel: &ChannelId, video: &VideoId) -> PathBuf {
    root.join(channel.as_str())
        .join(format!("{}.{}", video, SUBTITLE_EXTENSION))
}

/// Candidate videos split by whether they were already persisted
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Videos still to fetch, in candidate order
    pub pending: Vec<VideoId>,
    /// Videos skipped because their subtitle already exists
    pub done: Vec<VideoId>,
}

/// Split candidates into pending and already-downloaded videos
///
/// Order is preserved in both halves. Emits an info trace per skipped video.
/// An existence check that errors (e.g. permission denied) counts as "not
/// present", so the video is attempted again.
pub async fn partition_downloaded(
    root: &Path,
    channel: &ChannelId,
    candidates: Vec<VideoId>,
) -> Partition {
    let mut partition = Partition::default();

    for video in candidates {
        let path = subtitle_path(root, channel, &video);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => {
                info!(channel = %channel, video = %video, "skipping already downloaded video");
                partition.done.push(video);
            }
            Ok(false) => partition.pending.push(video),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "existence check failed, will refetch");
                partition.pending.push(video);
            }
        }
    }

    partition
}

/// Remove candidates whose subtitle already exists, preserving order
pub async fn filter_pending(
    root: &Path,
    channel: &ChannelId,
    candidates: Vec<VideoId>,
) -> Vec<VideoId> {
    partition_downloaded(root, channel, candidates).await.pending
}

/// Write a sanitized subtitle to its deterministic path
///
/// Creates the channel directory as needed and returns the written path.
pub async fn persist_subtitle(
    root: &Path,
    channel: &ChannelId,
    video: &VideoId,
    text: &str,
) -> std::io::Result<PathBuf> {
    let path = subtitle_path(root, channel, video);
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, text).await?;
    Ok(path)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ids(list: &[&str]) -> Vec<VideoId> {
        list.iter().map(|s| VideoId::from(*s)).collect()
    }

    #[test]
    fn test_subtitle_path_layout() {
        let path = subtitle_path(
            Path::new("subtitles"),
            &ChannelId::from("C1"),
            &VideoId::from("V1"),
        );
        assert_eq!(path, PathBuf::from("subtitles/C1/V1.txt"));
    }

    #[tokio::test]
    async fn test_filter_excludes_existing() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("subtitles");
        std::fs::create_dir_all(root.join("C1")).unwrap();
        std::fs::write(root.join("C1/V1.txt"), "hello").unwrap();

        let pending = filter_pending(&root, &ChannelId::from("C1"), ids(&["V1", "V2"])).await;
        assert_eq!(pending, ids(&["V2"]));
    }

    #[tokio::test]
    async fn test_existing_file_in_other_channel_does_not_count() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        std::fs::create_dir_all(root.join("C2")).unwrap();
        std::fs::write(root.join("C2/V1.txt"), "hello").unwrap();

        let pending = filter_pending(&root, &ChannelId::from("C1"), ids(&["V1"])).await;
        assert_eq!(pending, ids(&["V1"]));
    }

    #[tokio::test]
    async fn test_partition_preserves_order() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        let channel = ChannelId::from("C");
        for v in ["b", "d"] {
            persist_subtitle(&root, &channel, &VideoId::from(v), "x")
                .await
                .unwrap();
        }

        let partition = partition_downloaded(&root, &channel, ids(&["a", "b", "c", "d", "e"])).await;
        assert_eq!(partition.pending, ids(&["a", "c", "e"]));
        assert_eq!(partition.done, ids(&["b", "d"]));
    }

    #[tokio::test]
    async fn test_persist_creates_channel_dir() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("subtitles");

        let path = persist_subtitle(&root, &ChannelId::from("C9"), &VideoId::from("V9"), "text")
            .await
            .unwrap();
        assert_eq!(path, root.join("C9").join("V9.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "text");
    }

    #[tokio::test]
    async fn test_empty_candidates() {
        let dir = TempDir::new().unwrap();
        let partition = partition_downloaded(dir.path(), &ChannelId::from("C"), Vec::new()).await;
        assert!(partition.pending.is_empty());
        assert!(partition.done.is_empty());
    }
}
