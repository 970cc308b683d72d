//! Per-channel worker
//!
//! A worker walks one channel through `Enumerating → Filtering →
//! FetchingVideo(i) → Done`. Videos are processed strictly in order; a failed
//! video is logged and skipped, never aborting the channel.

use super::enumerate::enumerate_videos;
use super::failure_log::FailureLog;
use super::fetcher::SubtitleFetcher;
use super::store::{partition_downloaded, persist_subtitle};
use crate::error::Result;
use crate::source::SubtitleSource;
use crate::types::{ChannelId, ChannelReport, ChannelSkipReason, Event, FailureRecord, VideoId};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Everything a channel worker needs, cheap to clone into each task
#[derive(Clone)]
pub(crate) struct ChannelWorker {
    pub(crate) source: Arc<dyn SubtitleSource>,
    pub(crate) fetcher: Arc<SubtitleFetcher>,
    pub(crate) failure_log: Arc<FailureLog>,
    pub(crate) event_tx: broadcast::Sender<Event>,
    pub(crate) subtitles_dir: PathBuf,
    pub(crate) video_count: usize,
}

impl ChannelWorker {
    fn emit(&self, event: Event) {
        // no subscribers is fine
        let _ = self.event_tx.send(event);
    }

    /// Process one channel to completion
    pub(crate) async fn run(self, channel: ChannelId) -> ChannelReport {
        let mut report = ChannelReport {
            channel: channel.clone(),
            ..Default::default()
        };
        self.emit(Event::ChannelStarted {
            channel: channel.clone(),
        });

        let videos =
            enumerate_videos(self.source.as_ref(), &channel, Some(self.video_count)).await;
        report.enumerated = videos.len();
        if videos.is_empty() {
            warn!(channel = %channel, "no videos found for channel, skipping");
            self.emit(Event::ChannelSkipped {
                channel: channel.clone(),
                reason: ChannelSkipReason::NoVideos,
            });
            return self.finish(report);
        }

        let partition = partition_downloaded(&self.subtitles_dir, &channel, videos).await;
        report.skipped = partition.done.len();
        for video in partition.done {
            self.emit(Event::VideoSkipped {
                channel: channel.clone(),
                video,
            });
        }
        if partition.pending.is_empty() {
            info!(channel = %channel, "all videos already downloaded");
            self.emit(Event::ChannelSkipped {
                channel: channel.clone(),
                reason: ChannelSkipReason::AllDownloaded,
            });
            return self.finish(report);
        }

        for video in partition.pending {
            if self.process_video(&channel, video).await {
                report.saved += 1;
            } else {
                report.failed += 1;
            }
        }

        self.finish(report)
    }

    /// Fetch, sanitize and persist one video; returns whether it was saved
    async fn process_video(&self, channel: &ChannelId, video: VideoId) -> bool {
        let result: Result<PathBuf> = async {
            let text = self.fetcher.fetch(&video).await?;
            Ok(persist_subtitle(&self.subtitles_dir, channel, &video, &text).await?)
        }
        .await;

        match result.map_err(|e| e.to_string()) {
            Ok(path) => {
                info!(
                    channel = %channel,
                    video = %video,
                    path = %path.display(),
                    saved = true,
                    "subtitle saved successfully"
                );
                self.emit(Event::VideoSaved {
                    channel: channel.clone(),
                    video,
                    path,
                });
                true
            }
            Err(error) => {
                warn!(channel = %channel, video = %video, error = %error, "error downloading subtitle");
                let record = FailureRecord {
                    channel: channel.clone(),
                    video: video.clone(),
                    error: error.clone(),
                };
                self.failure_log.record(&record).await;
                self.emit(Event::VideoFailed {
                    channel: channel.clone(),
                    video,
                    error,
                });
                false
            }
        }
    }

    fn finish(&self, report: ChannelReport) -> ChannelReport {
        info!(
            channel = %report.channel,
            enumerated = report.enumerated,
            skipped = report.skipped,
            saved = report.saved,
            failed = report.failed,
            "channel finished"
        );
        self.emit(Event::ChannelFinished {
            report: report.clone(),
        });
        report
    }
}
