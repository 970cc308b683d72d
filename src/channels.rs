use crate::types::ChannelId;
use std::path::Path;
use tracing::{error, info};

/// Load channel identifiers from a line-oriented file
///
/// One identifier per non-empty line; surrounding whitespace is trimmed,
/// order and duplicates are preserved. A file that cannot be opened or read
/// yields an empty list after an error trace: callers treat that as
/// "nothing to do".
pub async fn load_channels(path: &Path) -> Vec<ChannelId> {
    info!(path = %path.display(), "loading channels");

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to read channels file");
            return Vec::new();
        }
    };

    let channels = parse_channels(&content);
    info!(count = channels.len(), "loaded channels");
    channels
}

fn parse_channels(content: &str) -> Vec<ChannelId> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ChannelId::from)
        .collect()
}
