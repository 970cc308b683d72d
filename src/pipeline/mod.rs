//! Concurrent fetch-and-sanitize pipeline
//!
//! [`Harvester`] owns one download cycle: it loads the channel list, spawns
//! one task per channel into a [`JoinSet`], and waits for every task before
//! checking what was persisted. The failure log is the only state shared
//! between tasks.
//!
//! Submodules:
//! - [`enumerate`]: soft-failing channel enumeration
//! - [`store`]: `<channel>/<video>.txt` layout and resumability filter
//! - [`fetcher`]: staging, locating, reading and sanitizing one subtitle
//! - [`failure_log`]: serialized append-only failure records

pub mod enumerate;
pub mod failure_log;
pub mod fetcher;
pub mod store;
mod worker;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod test_helpers;

use crate::channels::load_channels;
use crate::config::Config;
use crate::error::Result;
use crate::export::compile_export;
use crate::source::SubtitleSource;
use crate::types::{Event, ExportSummary, RunSummary};
use failure_log::FailureLog;
use fetcher::SubtitleFetcher;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use worker::ChannelWorker;

/// Capacity of the progress event channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Batch subtitle downloader and exporter
///
/// # Example
///
/// ```no_run
/// use subtitle_dl::{Config, Harvester, source};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let source = source::from_config(&config.fetch);
/// let harvester = Harvester::new(config, source).await?;
///
/// let summary = harvester.download_all().await;
/// println!("saved {} subtitles", summary.total_saved());
///
/// harvester.export().await?;
/// harvester.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct Harvester {
    config: Arc<Config>,
    source: Arc<dyn SubtitleSource>,
    fetcher: Arc<SubtitleFetcher>,
    failure_log: Arc<FailureLog>,
    event_tx: broadcast::Sender<Event>,
}

impl Harvester {
    /// Create a harvester and open its failure log
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or the failure log cannot be
    /// opened. Both are fatal for a download cycle.
    pub async fn new(config: Config, source: Arc<dyn SubtitleSource>) -> Result<Self> {
        config.validate()?;

        let failure_log = FailureLog::open(&config.paths.error_log)
            .await
            .inspect_err(|e| {
                error!(
                    path = %config.paths.error_log.display(),
                    error = %e,
                    "error opening failure log"
                );
            })?;

        let fetcher = SubtitleFetcher::new(source.clone(), &config);
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            config: Arc::new(config),
            source,
            fetcher: Arc::new(fetcher),
            failure_log: Arc::new(failure_log),
            event_tx,
        })
    }

    /// Subscribe to progress events
    ///
    /// Events sent before subscribing are not replayed.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    fn worker(&self) -> ChannelWorker {
        ChannelWorker {
            source: self.source.clone(),
            fetcher: self.fetcher.clone(),
            failure_log: self.failure_log.clone(),
            event_tx: self.event_tx.clone(),
            subtitles_dir: self.config.paths.subtitles_dir.clone(),
            video_count: self.config.fetch.video_count,
        }
    }

    /// Run one download cycle over every configured channel
    ///
    /// Never fails: per-channel and per-video problems are logged and
    /// reflected in the returned summary. Returns only after every channel
    /// task has finished.
    pub async fn download_all(&self) -> RunSummary {
        let channels = load_channels(&self.config.paths.channels_file).await;
        let mut summary = RunSummary {
            channels: channels.len(),
            ..Default::default()
        };

        if channels.is_empty() {
            warn!("no channels loaded, nothing to do");
            summary.nothing_downloaded = !self.subtitles_dir_exists().await;
            return summary;
        }

        let mut tasks = JoinSet::new();
        for channel in channels {
            let worker = self.worker();
            tasks.spawn(async move { worker.run(channel).await });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => summary.reports.push(report),
                Err(e) => {
                    error!(error = %e, "channel worker did not complete");
                    summary.crashed_workers += 1;
                }
            }
        }

        summary.nothing_downloaded = !self.subtitles_dir_exists().await;
        if summary.nothing_downloaded {
            warn!("no subtitles downloaded");
        } else {
            info!(
                channels = summary.channels,
                saved = summary.total_saved(),
                skipped = summary.total_skipped(),
                failed = summary.total_failed(),
                "subtitles downloaded"
            );
        }

        summary
    }

    /// Compile the persisted subtitles into the configured export file
    pub async fn export(&self) -> Result<ExportSummary> {
        compile_export(
            &self.config.paths.subtitles_dir,
            &self.config.paths.export_file,
            self.source.as_ref(),
        )
        .await
    }

    /// Close the failure log
    ///
    /// Call once after the last download cycle.
    pub async fn shutdown(&self) -> Result<()> {
        self.failure_log.close().await.inspect_err(|e| {
            error!(
                path = %self.failure_log.path().display(),
                error = %e,
                "error closing failure log"
            );
        })
    }

    async fn subtitles_dir_exists(&self) -> bool {
        tokio::fs::try_exists(&self.config.paths.subtitles_dir)
            .await
            .unwrap_or(false)
    }
}
