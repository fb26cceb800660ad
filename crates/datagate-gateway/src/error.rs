//! Error handling for the gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Transport-level request failures.
///
/// Structural and parameter errors are rejected with these before any store
/// call; store-level failures are shaped inline by the handlers instead so
/// UI layers can render them without special-casing status codes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed type name, identifier, or parameter.
    #[error("{0}")]
    BadRequest(String),

    /// The addressed entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Internal failure constructing the repository binding.
    #[error("{0}")]
    Internal(String),
}

/// Error response body.
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error flag.
    pub error: bool,
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = ErrorResponse {
            error: true,
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
