//! Request logging utilities for upstream relaying
//!
//! Provides structured logging with short correlation IDs so a single relayed
//! call can be followed from arrival to response.

use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Context for tracking a relayed request through the system
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Upstream provider handling this request
    pub provider: String,
    /// Relay endpoint being served
    pub endpoint: String,
    /// Model being used (if applicable)
    pub model: Option<String>,
    /// Number of messages in the shaped payload
    pub messages: usize,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(provider: &str, endpoint: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            provider: provider.to_string(),
            endpoint: endpoint.to_string(),
            model: None,
            messages: 0,
        }
    }

    /// Set the model for this request
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_messages(mut self, messages: usize) -> Self {
        self.messages = messages;
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Log request initiation
    pub fn log_request_start(&self) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            model = ?self.model,
            messages = %self.messages,
            "Relaying request"
        );
    }

    /// Log response received from upstream
    pub fn log_upstream_response(&self, status: u16, body_len: usize) {
        if status >= 400 {
            warn!(
                trace_id = %self.trace_id,
                provider = %self.provider,
                endpoint = %self.endpoint,
                status = %status,
                body_len = %body_len,
                elapsed_ms = %self.elapsed_ms(),
                "Upstream returned an error status"
            );
        } else {
            info!(
                trace_id = %self.trace_id,
                provider = %self.provider,
                endpoint = %self.endpoint,
                status = %status,
                body_len = %body_len,
                elapsed_ms = %self.elapsed_ms(),
                "Response received from upstream"
            );
        }
    }

    /// Log timeout
    pub fn log_timeout(&self, timeout_ms: u64) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            timeout_ms = %timeout_ms,
            elapsed_ms = %self.elapsed_ms(),
            "Upstream request timed out"
        );
    }

    /// Log connection error (specific for debugging connectivity issues)
    pub fn log_connection_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Connection to upstream failed"
        );
    }

    /// Log the status the relay answered with
    pub fn log_complete(&self, status: u16) {
        info!(
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            status = %status,
            elapsed_ms = %self.elapsed_ms(),
            "Request completed"
        );
    }

    /// Log request failure
    pub fn log_error(&self, error: &str) {
        error!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            endpoint = %self.endpoint,
            model = ?self.model,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Request failed"
        );
    }
}
