//! Completion provider abstraction
//!
//! Defines the transport seam between the relay pipeline and the upstream
//! completion API so the timeout wrapper can be exercised without a network.

use async_trait::async_trait;
use axum::http::StatusCode;

use crate::{error::AppResult, proxy::payload::UpstreamPayload};

/// Raw upstream answer: whatever status and body text came back
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

/// Trait defining the interface for completion providers
///
/// # Security
///
/// Implementations MUST:
/// - Send only the provider credential from configuration, never caller headers
/// - Return non-2xx upstream answers as `Ok(UpstreamReply)`, not as errors
/// - Make a single attempt per call
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name for logging
    fn name(&self) -> &'static str;

    /// Whether the provider holds the credential it needs to make calls
    fn is_configured(&self) -> bool;

    /// Send one chat completion request and read the full response body.
    ///
    /// Transport failures map to `AppError::UpstreamUnreachable` or
    /// `AppError::UpstreamTimeout`.
    async fn chat_completions(&self, payload: &UpstreamPayload) -> AppResult<UpstreamReply>;
}
