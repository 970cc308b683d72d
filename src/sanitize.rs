//! WebVTT subtitle sanitizing
//!
//! Turns a raw caption container (header, metadata lines, cue timings, inline
//! markup) into a single line of plain transcript text.
//!
//! Markup is stripped one line at a time and never spans a line break, so a
//! stray `<` in spoken text cannot swallow the cues after it. Lines are
//! classified after their tags are gone, which catches a metadata or timing
//! line wrapped in markup.
//!
//! The transform is idempotent: running it on its own output changes nothing.
//! Joining lines can produce a line that starts like a timing range or a
//! metadata key; only that leading fragment is cut, never the text behind it.

use regex::Regex;
use std::sync::LazyLock;

/// Cue markup: `<c>`, `</c>`, `<c.color>`, `<v Name>`, and `<00:00:01.500>` timestamps
#[allow(clippy::expect_used)]
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[A-Za-z][^<>\n]*>|<(?:\d+:)?\d{2}:\d{2}\.\d{3}>")
        .expect("tag pattern is valid")
});

#[allow(clippy::expect_used)]
static TIMECODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}:\d{2}:\d{2}\.\d{3}\s*-->\s*\d{2}:\d{2}:\d{2}\.\d{3}")
        .expect("timecode pattern is valid")
});

/// Container header line
const HEADER: &str = "WEBVTT";

/// Metadata line prefixes emitted by the caption source
const METADATA_PREFIXES: [&str; 2] = ["Kind:", "Language:"];

/// Sanitize a raw subtitle blob into flattened plain text
///
/// - drops the `WEBVTT` header, `Kind:` / `Language:` metadata lines and
///   `HH:MM:SS.mmm --> HH:MM:SS.mmm` timing lines (including trailing cue settings)
/// - strips inline tags such as `<c>` or `<00:00:01.500>`; a lone `<` is text
/// - joins the remaining non-blank lines with single spaces
///
/// Empty input yields empty output.
///
/// # Examples
///
/// ```
/// use subtitle_dl::sanitize::sanitize;
///
/// let raw = "WEBVTT\nKind: captions\nLanguage: en\n\n00:00:01.000 --> 00:00:02.000\n<b>Hi</b> there\n";
/// assert_eq!(sanitize(raw), "Hi there");
/// assert_eq!(sanitize(&sanitize(raw)), "Hi there");
/// ```
#[must_use]
pub fn sanitize(raw: &str) -> String {
    let joined = raw
        .lines()
        .map(strip_tags)
        .filter_map(|line| {
            let line = trim_text(&line);
            (!line.is_empty() && !is_container_line(line)).then(|| line.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ");

    cut_container_prefix(joined)
}

/// Remove markup from one line until none is left
fn strip_tags(line: &str) -> String {
    let mut line = line.to_string();
    while TAG_RE.is_match(&line) {
        line = TAG_RE.replace_all(&line, "").into_owned();
    }
    line
}

fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Whether a trimmed line is container structure rather than spoken text
fn is_container_line(line: &str) -> bool {
    container_prefix_len(line).is_some()
}

/// Length of the header, metadata key or timing range `text` starts with
fn container_prefix_len(text: &str) -> Option<usize> {
    if text.starts_with(HEADER) {
        return Some(HEADER.len());
    }
    if let Some(prefix) = METADATA_PREFIXES.iter().find(|p| text.starts_with(*p)) {
        return Some(prefix.len());
    }
    TIMECODE_RE.find(text).map(|m| m.end())
}

/// Cut leading container fragments off the joined transcript
///
/// Each cut shortens the text, so this terminates. Cutting can expose markup
/// that spanned the fragment boundary, hence the tag strip on every round.
fn cut_container_prefix(mut text: String) -> String {
    loop {
        let stripped = strip_tags(&text);
        let trimmed = trim_text(&stripped);
        match container_prefix_len(trimmed) {
            Some(len) => text = trimmed[len..].to_string(),
            None => {
                if trimmed.len() == text.len() {
                    return text;
                }
                text = trimmed.to_string();
            }
        }
    }
}

/// Replace embedded line breaks with spaces
///
/// Used on persisted subtitles before they are exported, in case a file was
/// written by something other than [`sanitize`].
#[must_use]
pub fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
