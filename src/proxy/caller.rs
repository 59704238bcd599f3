//! Deadline-bounded upstream calls
//!
//! The provider future is owned by `call` and wrapped in
//! `tokio::time::timeout`. When the deadline passes the future is dropped,
//! which aborts the in-flight HTTP request and releases its connection.

use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    proxy::{
        payload::UpstreamPayload,
        provider::{CompletionProvider, UpstreamReply},
    },
};

/// Single-attempt caller with a per-request deadline
#[derive(Clone)]
pub struct UpstreamCaller {
    provider: Arc<dyn CompletionProvider>,
    timeout: Duration,
}

impl UpstreamCaller {
    pub fn new(provider: Arc<dyn CompletionProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Make one upstream call. No retries.
    pub async fn call(&self, payload: &UpstreamPayload) -> AppResult<UpstreamReply> {
        match tokio::time::timeout(self.timeout, self.provider.chat_completions(payload)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::UpstreamTimeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }
}
