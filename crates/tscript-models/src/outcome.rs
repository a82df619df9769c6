//! Retrieval outcomes and reason codes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::segment::TranscriptSegment;
use crate::track::TrackKind;

/// Which strategy produced a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathUsed {
    /// Transcript library
    Library,
    /// Watch page scrape + caption track fetch
    Watchpage,
}

impl PathUsed {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathUsed::Library => "library",
            PathUsed::Watchpage => "watchpage",
        }
    }
}

impl fmt::Display for PathUsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caption origin as reported to callers. The library path cannot tell
/// manual from ASR captions, hence `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptKind {
    Manual,
    Asr,
    Unknown,
}

impl From<TrackKind> for TranscriptKind {
    fn from(kind: TrackKind) -> Self {
        match kind {
            TrackKind::Manual => TranscriptKind::Manual,
            TrackKind::Asr => TranscriptKind::Asr,
        }
    }
}

/// Machine-readable failure reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Input never resolved to a valid identifier
    MissingOrBadId,
    /// Upstream reachable but no usable captions
    NoCaptions,
    /// Upstream fetch failed or answered unexpectedly
    BlockedUpstream,
    /// Unhandled failure during orchestration
    UnexpectedError,
}

impl ReasonCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::MissingOrBadId => "missing_or_bad_id",
            ReasonCode::NoCaptions => "no_captions",
            ReasonCode::BlockedUpstream => "blocked_upstream",
            ReasonCode::UnexpectedError => "unexpected_error",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successfully retrieved, non-empty transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    /// Sorted by start, never empty
    pub segments: Vec<TranscriptSegment>,
    pub path: PathUsed,
    /// Language actually used (`unknown` when not determinable)
    pub language: String,
    pub kind: TranscriptKind,
}

/// Terminal result of one retrieval.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalOutcome {
    Success(Transcript),
    Failure(ReasonCode),
}

impl RetrievalOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RetrievalOutcome::Success(_))
    }

    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            RetrievalOutcome::Success(_) => None,
            RetrievalOutcome::Failure(reason) => Some(*reason),
        }
    }
}

/// Outcome plus the diagnostics accumulated while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalReport {
    pub outcome: RetrievalOutcome,
    pub diagnostics: Diagnostics,
}

impl RetrievalReport {
    pub fn success(transcript: Transcript, diagnostics: Diagnostics) -> Self {
        Self {
            outcome: RetrievalOutcome::Success(transcript),
            diagnostics,
        }
    }

    pub fn failure(reason: ReasonCode, diagnostics: Diagnostics) -> Self {
        Self {
            outcome: RetrievalOutcome::Failure(reason),
            diagnostics,
        }
    }
}
