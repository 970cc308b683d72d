//! CSV export of persisted subtitles
//!
//! Walks the `<channel>/<video>.txt` tree, re-resolves title and description
//! for every video through the [`SubtitleSource`], and writes one row per
//! subtitle file under a fixed header. Metadata failures degrade to empty
//! fields; they never drop a row or stop the export.

use crate::error::{Error, Result};
use crate::pipeline::store::SUBTITLE_EXTENSION;
use crate::sanitize::flatten_newlines;
use crate::source::SubtitleSource;
use crate::types::{ExportRow, ExportSummary, VideoId, VideoMetadata};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::task::spawn_blocking;
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// Column names of the export, in order
pub const EXPORT_HEADER: [&str; 5] = ["video_id", "title", "channel_id", "description", "subtitle"];

/// Build the export file from the subtitles tree
///
/// Rows follow a lexical walk of `subtitles_dir`. A missing tree produces a
/// header-only file. Subtitle files that cannot be read are logged and
/// produce no row.
///
/// # Errors
///
/// Returns an error only when the output file cannot be created or written.
pub async fn compile_export(
    subtitles_dir: &Path,
    output: &Path,
    source: &dyn SubtitleSource,
) -> Result<ExportSummary> {
    info!(output = %output.display(), "generating CSV export");

    // Fail before any metadata lookups if the target is unwritable
    let mut file = tokio::fs::File::create(output).await?;

    let mut summary = ExportSummary::default();
    // header written up front so an empty tree still yields it
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for path in subtitle_files(subtitles_dir).await? {
        let Some(row) = build_row(&path, source, &mut summary).await else {
            continue;
        };
        writer.serialize(&row)?;
        summary.rows += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;

    file.write_all(&bytes).await?;
    file.flush().await?;

    info!(
        output = %output.display(),
        rows = summary.rows,
        metadata_failures = summary.metadata_failures,
        unreadable = summary.unreadable,
        "CSV export generated successfully"
    );
    Ok(summary)
}

/// All `.txt` files under `root`, in lexical walk order
async fn subtitle_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !tokio::fs::try_exists(root).await.unwrap_or(false) {
        warn!(path = %root.display(), "subtitles directory does not exist, export will be empty");
        return Ok(Vec::new());
    }

    let root = root.to_path_buf();
    spawn_blocking(move || {
        WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    error!(error = %e, "error walking subtitles directory");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext == SUBTITLE_EXTENSION)
            })
            .collect()
    })
    .await
    .map_err(|e| Error::Other(format!("subtitle walk task panicked: {}", e)))
}

/// Read one subtitle file and resolve its metadata
async fn build_row(
    path: &Path,
    source: &dyn SubtitleSource,
    summary: &mut ExportSummary,
) -> Option<ExportRow> {
    let video_id = path.file_stem()?.to_string_lossy().into_owned();
    let channel_id = path
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            error!(path = %path.display(), error = %e, "error reading subtitle file");
            summary.unreadable += 1;
            return None;
        }
    };

    let metadata = match source.fetch_metadata(&VideoId::from(video_id.as_str())).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!(video = %video_id, error = %e, "error getting metadata, fields will be empty");
            summary.metadata_failures += 1;
            VideoMetadata::default()
        }
    };

    Some(ExportRow {
        video_id,
        title: metadata.title,
        channel_id,
        description: metadata.description,
        subtitle: flatten_newlines(&content),
    })
}
