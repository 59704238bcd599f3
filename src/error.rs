//! Error types for the relay
//!
//! Every local failure is converted into a JSON body of the form
//! `{"error": "...", "code": "..."}`. Upstream error responses are not
//! represented here; they are passed through verbatim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// A required secret is missing from the server configuration
    #[error("Missing {0} (server config)")]
    Configuration(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("CORS origin not allowed")]
    OriginRejected,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream request timed out after {timeout_ms} ms")]
    UpstreamTimeout { timeout_ms: u64 },

    /// DNS, connect, TLS or body-read failure talking to the upstream.
    /// The detail is logged, not returned to the caller.
    #[error("Upstream service unreachable")]
    UpstreamUnreachable(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::OriginRejected => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamTimeout { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::OriginRejected => "ORIGIN_REJECTED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::UpstreamTimeout { .. } => "UPSTREAM_TIMEOUT",
            AppError::UpstreamUnreachable(_) => "UPSTREAM_UNREACHABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            // anyhow chains may carry arbitrary detail; keep it in the logs
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Unhandled error while serving request");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: message,
            code: self.code(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
