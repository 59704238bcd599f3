//! Chat completions relay endpoint
//!
//! `POST /api/chat` forwards a caller-built conversation to the upstream
//! chat completions API. `GET /api/chat` documents how to call it.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    proxy::payload::{parse_body, IncomingChatRequest},
    routes::relay::{forward_to_upstream, read_body},
    AppState,
};

pub const CHAT_ENDPOINT: &str = "/api/chat";

/// Relay a chat completion request
pub async fn relay_chat(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let body = read_body(request).await?;
    let chat_request: IncomingChatRequest = parse_body(&body)?;

    let payload = chat_request.to_payload(&state.config.default_model);

    Ok(forward_to_upstream(&state, CHAT_ENDPOINT, payload).await)
}

/// Usage hint for callers that open the endpoint with GET
pub async fn chat_usage() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({
            "ok": true,
            "note": "Use POST with JSON and X-Relay-Key",
            "example": {
                "url": CHAT_ENDPOINT,
                "method": "POST",
                "headers": {
                    "content-type": "application/json",
                    "X-Relay-Key": "<your-relay-key>"
                },
                "body": {
                    "model": "gpt-4o-mini",
                    "messages": [
                        { "role": "system", "content": "You are a helpful assistant." },
                        { "role": "user", "content": "phishing là gì?" }
                    ],
                    "temperature": 0.2
                }
            }
        })),
    )
}
