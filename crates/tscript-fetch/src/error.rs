//! Retrieval error types.

use std::time::Duration;

use thiserror::Error;

pub type FetchResult<T> = Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {status}")]
    Status { status: u16 },

    #[error("ytInitialPlayerResponse not found in watch page")]
    PlayerResponseNotFound,

    #[error("Malformed player response: {0}")]
    PlayerResponseMalformed(#[source] serde_json::Error),

    #[error("Invalid caption payload: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("Transcript library error: {0}")]
    Library(String),

    #[error("Transcript library unavailable")]
    LibraryUnavailable,

    #[error("Timeout after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    pub fn library(msg: impl Into<String>) -> Self {
        Self::Library(msg.into())
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status } => Some(*status),
            FetchError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Short machine-readable code for a failed watch page fetch.
    pub fn watch_page_code(&self) -> String {
        match self {
            FetchError::Status { status } => format!("watchpage_fetch_failed:{}", status),
            FetchError::PlayerResponseNotFound => "player_response_not_found".to_string(),
            FetchError::PlayerResponseMalformed(_) => "player_response_parse_error".to_string(),
            FetchError::Timeout(_) => "watchpage_timeout".to_string(),
            _ => "watchpage_fetch_failed:network".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_page_codes() {
        assert_eq!(
            FetchError::Status { status: 403 }.watch_page_code(),
            "watchpage_fetch_failed:403"
        );
        assert_eq!(
            FetchError::PlayerResponseNotFound.watch_page_code(),
            "player_response_not_found"
        );
        let malformed = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            FetchError::PlayerResponseMalformed(malformed).watch_page_code(),
            "player_response_parse_error"
        );
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(FetchError::Status { status: 404 }.status(), Some(404));
        assert_eq!(FetchError::LibraryUnavailable.status(), None);
    }

    #[test]
    fn test_timeout_display() {
        let err = FetchError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Timeout after 1.5s");
    }
}
