//! Axum HTTP API server for transcript retrieval.
//!
//! This crate provides:
//! - `GET /api/transcript` (also `/transcript`) with CORS and a JSON envelope
//! - Health and Prometheus metrics endpoints
//! - Request ID and request logging middleware

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use response::{assemble, TranscriptResponse};
pub use routes::create_router;
pub use state::AppState;
