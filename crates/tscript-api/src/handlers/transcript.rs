//! Transcript endpoint.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use futures_util::FutureExt;
use serde::Deserialize;
use tracing::{error, warn};
use tscript_models::{
    resolve_video_id, Diagnostics, ReasonCode, RetrievalReport, VideoId, VideoIdError,
};

use crate::error::{ApiError, ApiResult};
use crate::response::{assemble, TranscriptResponse};
use crate::state::AppState;

/// Query parameters for `GET /api/transcript`.
#[derive(Debug, Default, Deserialize)]
pub struct TranscriptQuery {
    /// Bare video ID
    pub id: Option<String>,
    /// Full video URL
    pub url: Option<String>,
    /// Comma-separated language hint
    pub lang: Option<String>,
    /// `1` or `true` adds diagnostics
    pub debug: Option<String>,
}

impl TranscriptQuery {
    /// Resolve `id`, then `url`. The first input that resolves wins.
    pub fn video_id(&self) -> Result<VideoId, VideoIdError> {
        let mut result = Err(VideoIdError::Empty);
        for raw in [self.id.as_deref(), self.url.as_deref()].into_iter().flatten() {
            match resolve_video_id(raw) {
                Ok(id) => return Ok(id),
                Err(VideoIdError::Empty) => {}
                Err(e) => result = Err(e),
            }
        }
        result
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
            .as_deref()
            .map(str::trim)
            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
    }
}

/// Retrieve a transcript.
pub async fn get_transcript(
    State(state): State<AppState>,
    Query(query): Query<TranscriptQuery>,
) -> ApiResult<Json<TranscriptResponse>> {
    let video_id = query.video_id()?;

    let (languages, warnings) = state.languages.build_with_warnings(query.lang.as_deref());
    for warning in &warnings {
        warn!(video_id = %video_id, "{}", warning);
    }

    let deadline = state.config.request_timeout;
    let retrieval = tokio::time::timeout(
        deadline,
        AssertUnwindSafe(state.orchestrator.retrieve(&video_id, &languages)).catch_unwind(),
    )
    .await;

    let mut report = match retrieval {
        Ok(Ok(report)) => report,
        Ok(Err(panic)) => {
            let message = panic_message(panic.as_ref());
            error!(video_id = %video_id, error = %message, "Transcript retrieval panicked");
            return Err(ApiError::internal_for(&state.config, message));
        }
        Err(_) => {
            warn!(
                video_id = %video_id,
                timeout_ms = deadline.as_millis() as u64,
                "Transcript retrieval timed out"
            );
            let diagnostics = Diagnostics {
                note: Some("retrieval_timeout".to_string()),
                ..Default::default()
            };
            RetrievalReport::failure(ReasonCode::BlockedUpstream, diagnostics)
        }
    };

    report.diagnostics.warnings = warnings;
    Ok(Json(assemble(report, query.debug_enabled())))
}

/// CORS preflight for the transcript routes.
pub async fn transcript_preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(id: Option<&str>, url: Option<&str>) -> TranscriptQuery {
        TranscriptQuery {
            id: id.map(str::to_string),
            url: url.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_video_id_prefers_id_then_url() {
        let q = query(Some("dQw4w9WgXcQ"), Some("https://youtu.be/aaaaaaaaaaa"));
        assert_eq!(q.video_id().unwrap().as_str(), "dQw4w9WgXcQ");

        let q = query(Some("bad"), Some("https://youtu.be/aaaaaaaaaaa"));
        assert_eq!(q.video_id().unwrap().as_str(), "aaaaaaaaaaa");

        let q = query(None, Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"));
        assert_eq!(q.video_id().unwrap().as_str(), "dQw4w9WgXcQ");
    }

    #[test]
    fn test_video_id_errors() {
        assert_eq!(query(None, None).video_id().unwrap_err(), VideoIdError::Empty);
        assert_eq!(query(Some("  "), None).video_id().unwrap_err(), VideoIdError::Empty);
        assert_eq!(
            query(Some("not-an-id"), None).video_id().unwrap_err(),
            VideoIdError::NotFound
        );
    }

    #[test]
    fn test_debug_flag() {
        let mut q = TranscriptQuery::default();
        assert!(!q.debug_enabled());
        for (value, expected) in [("1", true), ("true", true), ("TRUE", true), ("0", false), ("yes", false)] {
            q.debug = Some(value.to_string());
            assert_eq!(q.debug_enabled(), expected, "debug={}", value);
        }
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }
}
