//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache engine and its HTTP adapter.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is not resident in the cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Every slot in the slot space is occupied
    #[error("Slot space full, cannot place key: {0}")]
    RingFull(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration rejected at startup
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Durable append to the operation log failed; the mutation was not applied
    #[error("Operation log write failed: {0}")]
    LogWrite(#[source] std::io::Error),

    /// The command sequencer no longer accepts submissions
    #[error("Cache is shutting down")]
    ShuttingDown,

    /// Draining queued commands did not finish before the deadline
    #[error("Shutdown deadline of {0:?} exceeded, remaining commands aborted")]
    ShutdownTimeout(Duration),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::RingFull(_) | CacheError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::InvalidConfig(_)
            | CacheError::LogWrite(_)
            | CacheError::ShutdownTimeout(_)
            | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
