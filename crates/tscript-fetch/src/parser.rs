//! Caption payload parsing.
//!
//! Two payload shapes are normalized into [`TranscriptSegment`]s:
//! cues already parsed by the transcript library, and the upstream
//! timed-event document (`fmt=json3`). Both outputs are sorted by start time
//! with a stable tie-break and never contain empty-text segments.

use serde::{Deserialize, Deserializer};
use tscript_models::{sort_segments, TranscriptSegment};

use crate::error::{FetchError, FetchResult};

/// A pre-parsed cue as returned by the transcript library (seconds).
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryCue {
    pub text: String,
    pub offset: f64,
    pub duration: f64,
}

/// Timed-event caption document. `null` entries in `events` are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimedTextDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<Option<TimedTextEvent>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedTextEvent {
    pub t_start_ms: Option<f64>,
    pub d_duration_ms: Option<f64>,
    /// Alternate duration field, used only when `dDurationMs` is absent
    pub dur_ms: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimedTextSeg {
    #[serde(default, deserialize_with = "null_as_default")]
    pub utf8: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TimedTextDocument {
    /// Parse a raw payload body.
    pub fn from_slice(body: &[u8]) -> FetchResult<Self> {
        serde_json::from_slice(body).map_err(FetchError::Payload)
    }
}

/// Normalize library cues.
pub fn parse_library_cues(cues: &[LibraryCue]) -> Vec<TranscriptSegment> {
    let mut segments: Vec<TranscriptSegment> = cues
        .iter()
        .filter_map(|cue| TranscriptSegment::new(cue.offset, cue.duration, &cue.text))
        .collect();
    sort_segments(&mut segments);
    segments
}

/// Normalize a timed-event document.
pub fn parse_timed_text(doc: &TimedTextDocument) -> Vec<TranscriptSegment> {
    let mut segments: Vec<TranscriptSegment> = doc
        .events
        .iter()
        .flatten()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let start = event.t_start_ms.unwrap_or(0.0) / 1000.0;
            let duration = event.d_duration_ms.or(event.dur_ms).unwrap_or(0.0) / 1000.0;
            // newlines are whitespace, collapsed along with everything else
            TranscriptSegment::new(start, duration, &text)
        })
        .collect();
    sort_segments(&mut segments);
    segments
}
