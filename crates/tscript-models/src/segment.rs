//! Normalized transcript segments.

use serde::{Deserialize, Serialize};

/// One unit of transcript text with timing in seconds.
///
/// `text` is never empty and has no leading, trailing or repeated whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start offset in seconds
    pub start: f64,
    /// Duration in seconds
    #[serde(rename = "dur")]
    pub duration: f64,
    /// Whitespace-collapsed caption text
    pub text: String,
}

impl TranscriptSegment {
    /// Build a normalized segment.
    ///
    /// Non-finite or negative timings become zero. Returns `None` when the text
    /// is empty after whitespace collapsing.
    pub fn new(start: f64, duration: f64, text: &str) -> Option<Self> {
        let text = collapse_whitespace(text);
        if text.is_empty() {
            return None;
        }
        Some(Self {
            start: sanitize_seconds(start),
            duration: sanitize_seconds(duration),
            text,
        })
    }

    /// End offset in seconds.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Collapse runs of whitespace (including newlines) to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Sort ascending by start; equal starts keep their original order.
pub fn sort_segments(segments: &mut [TranscriptSegment]) {
    // slice::sort_by is stable
    segments.sort_by(|a, b| a.start.total_cmp(&b.start));
}

fn sanitize_seconds(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
