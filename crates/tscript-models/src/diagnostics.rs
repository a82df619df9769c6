//! Per-request diagnostics accumulated during retrieval.
//!
//! Purely additive: nothing in the retrieval flow reads these back, and they
//! are only serialized when the caller asks for debug output.

use serde::Serialize;

use crate::track::{CaptionTrack, TrackKind};

/// Library strategy summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryStatus {
    /// A language candidate produced a transcript
    Hit,
    /// Every candidate failed
    Miss,
    /// The library is not compiled in or not usable
    Unavailable,
}

/// A failed library attempt for one language candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageAttempt {
    pub language: String,
    pub error: String,
}

/// Track chosen by the watch-page strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedTrack {
    pub language_code: String,
    pub kind: TrackKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&CaptionTrack> for SelectedTrack {
    fn from(track: &CaptionTrack) -> Self {
        Self {
            language_code: track.language_code.clone(),
            kind: track.kind,
            name: track.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Diagnostic accumulator threaded through one retrieval.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tried_langs: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lib: Option<LibraryStatus>,

    /// Last library error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lib_err: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lib_attempts: Vec<LanguageAttempt>,

    /// Watch page failure code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,

    /// Caption payload HTTP status on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Language codes of the available tracks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_track: Option<SelectedTrack>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_details: Option<VideoDetails>,

    /// Ignored language hint entries
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed library attempt; the latest error also becomes `libErr`.
    pub fn record_library_failure(&mut self, language: impl Into<String>, error: impl Into<String>) {
        let error = error.into();
        self.lib_err = Some(error.clone());
        self.lib_attempts.push(LanguageAttempt {
            language: language.into(),
            error,
        });
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_diagnostics_serialize_to_empty_object() {
        let json = serde_json::to_value(Diagnostics::new()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_library_failures_accumulate() {
        let mut diag = Diagnostics::new();
        diag.record_library_failure("en", "no transcript");
        diag.record_library_failure("de", "timed out");

        assert_eq!(diag.lib_err.as_deref(), Some("timed out"));
        assert_eq!(diag.lib_attempts.len(), 2);

        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["libErr"], "timed out");
        assert_eq!(json["libAttempts"][0]["language"], "en");
    }

    #[test]
    fn test_selected_track_camel_case() {
        let track = CaptionTrack {
            language_code: "en".to_string(),
            kind: TrackKind::Asr,
            name: Some("English (auto-generated)".to_string()),
            source_locator: "https://example.com".to_string(),
        };
        let json = serde_json::to_value(SelectedTrack::from(&track)).unwrap();
        assert_eq!(json["languageCode"], "en");
        assert_eq!(json["kind"], "asr");
    }
}
