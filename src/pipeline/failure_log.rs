//! Append-only log of failed video fetches

use crate::error::Result;
use crate::types::FailureRecord;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{error, warn};

/// Shared sink for [`FailureRecord`]s
///
/// Opened once per run and handed to every channel worker behind an `Arc`.
/// Each record is written as one complete line while holding the lock, so
/// concurrent workers never interleave inside an entry. The file is opened
/// in append mode and is never truncated.
#[derive(Debug)]
pub struct FailureLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl FailureLog {
    /// Open (or create) the log for appending
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened. Callers treat this as
    /// fatal: a download cycle does not start without its failure log.
    pub async fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(Some(file)),
        })
    }

    /// Path of the underlying file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record
    ///
    /// Write errors are reported through tracing and swallowed; a broken log
    /// never fails the download it describes.
    pub async fn record(&self, record: &FailureRecord) {
        let mut line = record.to_line();
        line.push('\n');

        let mut guard = self.file.lock().await;
        let Some(file) = guard.as_mut() else {
            warn!(
                channel = %record.channel,
                video = %record.video,
                "failure log already closed, dropping record"
            );
            return;
        };

        let written: std::io::Result<()> = async {
            file.write_all(line.as_bytes()).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            error!(
                path = %self.path.display(),
                error = %e,
                "error writing to failure log"
            );
        }
    }

    /// Flush and close the log
    ///
    /// Records appended after closing are dropped with a warning. Closing
    /// twice is a no-op.
    pub async fn close(&self) -> Result<()> {
        let mut guard = self.file.lock().await;
        if let Some(mut file) = guard.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        Ok(())
    }
}
