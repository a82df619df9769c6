//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tscript_models::{ReasonCode, VideoIdError};

use crate::config::ApiConfig;
use crate::response::TranscriptResponse;

const REDACTED_INTERNAL_MESSAGE: &str = "An internal error occurred";

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidVideoId(#[from] VideoIdError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Internal error for a client; production hides the detail.
    pub fn internal_for(config: &ApiConfig, msg: impl Into<String>) -> Self {
        if config.is_production() {
            Self::internal(REDACTED_INTERNAL_MESSAGE)
        } else {
            Self::internal(msg)
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidVideoId(_) => StatusCode::BAD_REQUEST,
            // logical failures travel in the body
            ApiError::Internal(_) => StatusCode::OK,
        }
    }

    pub fn reason(&self) -> ReasonCode {
        match self {
            ApiError::InvalidVideoId(_) => ReasonCode::MissingOrBadId,
            ApiError::Internal(_) => ReasonCode::UnexpectedError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = match &self {
            ApiError::Internal(msg) => msg.clone(),
            _ => self.to_string(),
        };

        let body = TranscriptResponse::failure(self.reason()).with_error(detail);

        (status, Json(body)).into_response()
    }
}
