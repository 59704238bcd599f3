//! OpenAI chat completions client
//!
//! Sends shaped payloads to `{OPENAI_API_URL}/chat/completions` with the
//! server-held API key.

use async_trait::async_trait;
use tracing::{debug, error, instrument};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    proxy::{
        headers::build_default_headers,
        payload::UpstreamPayload,
        provider::{CompletionProvider, UpstreamReply},
    },
};

/// OpenAI-compatible completion provider
pub struct OpenAIProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.openai_api_url.clone(),
            api_key: config.openai_api_key.clone(),
            timeout_ms: config.timeout_ms(),
        }
    }

    fn transport_error(&self, err: reqwest::Error, url: &str) -> AppError {
        if err.is_timeout() {
            AppError::UpstreamTimeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            error!(url = %url, error = %err, "Failed to reach upstream");
            AppError::UpstreamUnreachable(err.to_string())
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip_all, fields(model = %payload.model))]
    async fn chat_completions(&self, payload: &UpstreamPayload) -> AppResult<UpstreamReply> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::Configuration("OPENAI_API_KEY"))?;

        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, messages = payload.messages.len(), "Sending request to upstream");

        let response = self
            .client
            .post(&url)
            .headers(build_default_headers(api_key)?)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e, &url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e, &url))?;

        debug!(url = %url, status = %status, body_len = body.len(), "Received response from upstream");

        Ok(UpstreamReply { status, body })
    }
}
