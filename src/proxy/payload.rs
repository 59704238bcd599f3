//! Request shaping
//!
//! Inbound relay bodies are mapped onto the exact payload the upstream chat
//! completions endpoint receives. Only recognized keys survive; anything else
//! in the inbound JSON is dropped.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Temperature used on the chat path when the caller omits one
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Fixed temperature of the FAQ path
pub const FAQ_TEMPERATURE: f64 = 0.2;

pub const FAQ_SYSTEM_PROMPT: &str =
    "You are a concise, helpful cybersecurity assistant for anti-scam FAQs.";

/// Asked when the FAQ caller sends no question
pub const FAQ_DEFAULT_QUESTION: &str = "Hướng dẫn an toàn tài khoản ngân hàng?";

/// Only called by serde when the key exists, so an explicit `null` becomes
/// `Some(Value::Null)` rather than `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Secondary sampling parameters.
///
/// `Some` means the caller supplied the key. Values are forwarded untouched,
/// so `0`, `""` and `null` all reach the upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub top_p: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub stop: Option<Value>,
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingChatRequest {
    #[serde(default)]
    pub model: Option<String>,
    /// Forwarded as-is, empty included
    pub messages: Vec<Value>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(flatten)]
    pub sampling: SamplingParams,
}

/// Body of `POST /api/ai-faq`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingFaqRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// JSON body sent to the upstream `/chat/completions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamPayload {
    pub model: String,
    pub messages: Vec<Value>,
    pub temperature: f64,
    #[serde(flatten)]
    pub sampling: SamplingParams,
}

fn resolve_model(model: Option<&str>, default_model: &str) -> String {
    match model.map(str::trim) {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => default_model.to_string(),
    }
}

impl IncomingChatRequest {
    pub fn to_payload(&self, default_model: &str) -> UpstreamPayload {
        UpstreamPayload {
            model: resolve_model(self.model.as_deref(), default_model),
            messages: self.messages.clone(),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            sampling: self.sampling.clone(),
        }
    }
}

impl IncomingFaqRequest {
    /// The question actually sent, after the default fallback
    pub fn effective_question(&self) -> &str {
        match self.question.as_deref() {
            Some(q) if !q.trim().is_empty() => q,
            _ => FAQ_DEFAULT_QUESTION,
        }
    }

    pub fn to_payload(&self, default_model: &str) -> UpstreamPayload {
        UpstreamPayload {
            model: resolve_model(self.model.as_deref(), default_model),
            messages: vec![
                serde_json::json!({ "role": "system", "content": FAQ_SYSTEM_PROMPT }),
                serde_json::json!({ "role": "user", "content": self.effective_question() }),
            ],
            temperature: FAQ_TEMPERATURE,
            sampling: SamplingParams::default(),
        }
    }
}

/// Parse a relay request body. An empty body reads as `{}`.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
}
