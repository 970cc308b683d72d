//! Clearing persisted state

use crate::config::PathsConfig;
use crate::error::Result;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{error, info};

/// Remove the staging directory and the persisted subtitles tree
///
/// A directory that does not exist is already clear. Both removals are
/// attempted even when the first one fails; the first error is returned.
/// The failure log and the export file are left untouched.
pub async fn clear_state(paths: &PathsConfig) -> Result<()> {
    info!("clearing all downloaded files and directories");

    let staging = remove_dir(&paths.staging_dir).await;
    let subtitles = remove_dir(&paths.subtitles_dir).await;
    staging.and(subtitles)
}

async fn remove_dir(path: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => {
            info!(path = %path.display(), "removed directory");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => {
            error!(path = %path.display(), error = %e, "error clearing directory");
            Err(e.into())
        }
    }
}
