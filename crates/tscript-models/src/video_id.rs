//! Video identifier parsing and validation.
//!
//! Accepts a bare identifier or any of the common YouTube URL shapes and
//! returns the canonical 11-character video ID.
//!
//! Supported shapes:
//! - `dQw4w9WgXcQ`
//! - `https://www.youtube.com/watch?v=dQw4w9WgXcQ`
//! - `https://youtu.be/dQw4w9WgXcQ`
//! - `https://youtube.com/embed/dQw4w9WgXcQ`
//! - `https://youtube.com/shorts/dQw4w9WgXcQ`
//! - `https://youtube.com/live/dQw4w9WgXcQ`
//! - free text containing `v=dQw4w9WgXcQ` (last resort)
//!
//! # Security
//! - Input is treated as untrusted
//! - Identifiers are strictly validated (11 chars, alphanumeric + `-_`)
//! - No network access

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// YouTube video IDs are exactly 11 characters.
pub const VIDEO_ID_LEN: usize = 11;

/// Path prefixes whose following segment is the video ID.
const ID_PATH_MARKERS: [&str; 3] = ["embed", "shorts", "live"];

/// Errors that can occur while resolving a video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoIdError {
    /// Nothing was supplied
    #[error("No video identifier supplied")]
    Empty,
    /// Input did not contain a usable identifier
    #[error("Could not extract a valid 11-character video ID")]
    NotFound,
}

/// Result type for identifier resolution.
pub type VideoIdResult<T> = Result<T, VideoIdError>;

/// Canonical 11-character video identifier.
///
/// Can only be constructed through validation, so every value matches
/// `[A-Za-z0-9_-]{11}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Validate a bare identifier. URLs are not accepted here; see [`resolve_video_id`].
    pub fn parse(s: &str) -> VideoIdResult<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VideoIdError::Empty);
        }
        if is_valid_video_id(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(VideoIdError::NotFound)
        }
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for VideoId {
    type Err = VideoIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        resolve_video_id(s)
    }
}

impl TryFrom<String> for VideoId {
    type Error = VideoIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

/// Check that a string has the exact identifier shape.
pub fn is_valid_video_id(s: &str) -> bool {
    s.len() == VIDEO_ID_LEN
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Resolve raw user input (bare ID or URL) into a [`VideoId`].
///
/// Order of attempts:
/// 1. the trimmed input is itself an identifier
/// 2. the input parses as a URL: `v` query parameter, the segment after
///    `/embed/`, `/shorts/` or `/live/`, a sole path segment (`youtu.be`),
///    then the last path segment
/// 3. the input is not a URL: a `v=<id>` fragment anywhere in the text
///
/// # Example
/// ```
/// use tscript_models::resolve_video_id;
///
/// let id = resolve_video_id("https://youtu.be/dQw4w9WgXcQ?t=30").unwrap();
/// assert_eq!(id.as_str(), "dQw4w9WgXcQ");
/// ```
pub fn resolve_video_id(raw: &str) -> VideoIdResult<VideoId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(VideoIdError::Empty);
    }

    if is_valid_video_id(trimmed) {
        return Ok(VideoId(trimmed.to_string()));
    }

    let found = match parse_url(trimmed) {
        Some(url) => extract_from_url(&url),
        None => extract_from_text(trimmed),
    };

    found.map(VideoId).ok_or(VideoIdError::NotFound)
}

/// Parse as an absolute URL, retrying with `https://` for scheme-less
/// host/path input such as `youtu.be/dQw4w9WgXcQ`.
fn parse_url(s: &str) -> Option<Url> {
    match Url::parse(s) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) if looks_like_host_path(s) => {
            Url::parse(&format!("https://{}", s)).ok()
        }
        Err(_) => None,
    }
}

fn looks_like_host_path(s: &str) -> bool {
    let host = s.split(['/', '?', '#']).next().unwrap_or_default();
    host.contains('.') && !host.chars().any(char::is_whitespace)
}

/// Extract an identifier from a parsed URL, trying each location in turn.
fn extract_from_url(url: &Url) -> Option<String> {
    let from_query = url
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.trim().to_string());

    let segments: Vec<&str> = url
        .path_segments()
        .map(|parts| parts.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    let after_marker = segments
        .windows(2)
        .find(|pair| {
            ID_PATH_MARKERS
                .iter()
                .any(|marker| pair[0].eq_ignore_ascii_case(marker))
        })
        .map(|pair| pair[1].to_string());

    let sole_segment = match segments.as_slice() {
        [only] => Some(only.to_string()),
        _ => None,
    };

    let last_segment = segments.last().map(|s| s.to_string());

    [from_query, after_marker, sole_segment, last_segment]
        .into_iter()
        .flatten()
        .find(|candidate| is_valid_video_id(candidate))
}

/// Last-resort `v=<id>` extraction from text that is not a URL.
fn extract_from_text(s: &str) -> Option<String> {
    static V_PARAM: OnceLock<Regex> = OnceLock::new();
    let re = V_PARAM.get_or_init(|| {
        // SAFETY: constant pattern, verified by tests.
        Regex::new(r"(?:^|[?&#/\s])v=([A-Za-z0-9_-]{11})(?:$|[^A-Za-z0-9_-])")
            .expect("valid v= pattern")
    });

    re.captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
