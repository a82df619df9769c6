//! Caption track descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Origin of a caption track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    /// Authored by a human
    Manual,
    /// Automatic speech recognition
    Asr,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Manual => "manual",
            TrackKind::Asr => "asr",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One caption stream available upstream for a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    /// Upstream language code (`en`, `pt-BR`, ...)
    pub language_code: String,
    pub kind: TrackKind,
    /// Human-readable label
    pub name: Option<String>,
    /// Opaque fetch locator (URL) for the caption payload
    pub source_locator: String,
}

impl CaptionTrack {
    pub fn is_manual(&self) -> bool {
        self.kind == TrackKind::Manual
    }

    pub fn is_asr(&self) -> bool {
        self.kind == TrackKind::Asr
    }

    /// Whether the language code starts with `en` (case-insensitive).
    pub fn is_english(&self) -> bool {
        self.language_code
            .get(..2)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("en"))
    }
}
