//! Response envelope for the transcript endpoint.

use serde::Serialize;
use tscript_models::{
    Diagnostics, PathUsed, ReasonCode, RetrievalOutcome, RetrievalReport, TranscriptKind,
    TranscriptSegment,
};

/// JSON body returned by the transcript endpoint.
///
/// Success carries `segments`, `path`, `language` and `kind`; failure carries
/// `reason`. `debug` is present only when requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<TranscriptSegment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathUsed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<TranscriptKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Diagnostics>,
    /// Message for `missing_or_bad_id` and `unexpected_error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranscriptResponse {
    pub fn failure(reason: ReasonCode) -> Self {
        Self {
            success: false,
            segments: None,
            path: None,
            language: None,
            kind: None,
            reason: Some(reason),
            debug: None,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Map a retrieval report to the response envelope. Diagnostics are attached
/// only when `include_debug` is set and never change `success` or `reason`.
pub fn assemble(report: RetrievalReport, include_debug: bool) -> TranscriptResponse {
    let mut response = match report.outcome {
        RetrievalOutcome::Success(transcript) => TranscriptResponse {
            success: true,
            segments: Some(transcript.segments),
            path: Some(transcript.path),
            language: Some(transcript.language),
            kind: Some(transcript.kind),
            reason: None,
            debug: None,
            error: None,
        },
        RetrievalOutcome::Failure(reason) => TranscriptResponse::failure(reason),
    };

    if include_debug {
        response.debug = Some(report.diagnostics);
    }
    response
}
