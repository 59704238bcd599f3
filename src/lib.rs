//! openai-relay - authenticated pass-through to an LLM completion API
//!
//! Browsers call the relay with a shared relay key; the relay shapes the
//! request, adds the server-held upstream API key and returns the upstream
//! answer unchanged. Origin checks, relay key checks and the upstream timeout
//! are enforced here.

pub mod config;
pub mod error;
pub mod middleware;
pub mod proxy;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::{AllowedOrigins, Config};
pub use crate::error::{AppError, AppResult};
pub use crate::proxy::{CompletionProvider, OpenAIProvider, UpstreamCaller};

/// Application state shared across all request handlers.
///
/// Read-only after construction.
pub struct AppState {
    pub config: Config,
    /// Deadline-bounded access to the completion provider
    pub upstream: UpstreamCaller,
    pub start_time: Instant,
}

impl AppState {
    /// Create the application state with the OpenAI provider
    pub fn new(config: Config) -> Result<Self> {
        // The caller enforces the overall deadline; the client-level timeouts
        // are a backstop for the connection pool
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .connect_timeout(config.upstream_timeout)
            .timeout(config.upstream_timeout)
            .build()?;

        let provider: Arc<dyn CompletionProvider> =
            Arc::new(OpenAIProvider::new(http_client, &config));

        Ok(Self::with_provider(config, provider))
    }

    /// Create the application state around an existing provider
    pub fn with_provider(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        let upstream = UpstreamCaller::new(provider, config.upstream_timeout);

        Self {
            config,
            upstream,
            start_time: Instant::now(),
        }
    }
}
