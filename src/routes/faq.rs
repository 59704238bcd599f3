//! Anti-scam FAQ endpoint
//!
//! `POST /api/ai-faq` wraps a single question in a fixed cybersecurity
//! assistant prompt and relays it upstream.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    response::Response,
};
use tracing::debug;

use crate::{
    error::AppError,
    proxy::payload::{parse_body, IncomingFaqRequest},
    routes::relay::{forward_to_upstream, read_body},
    AppState,
};

pub const FAQ_ENDPOINT: &str = "/api/ai-faq";

/// Relay an FAQ question
pub async fn relay_faq(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, AppError> {
    let body = read_body(request).await?;
    let faq_request: IncomingFaqRequest = parse_body(&body)?;

    debug!(default_question = faq_request.question.is_none(), "Processing FAQ request");
    let payload = faq_request.to_payload(&state.config.default_model);

    Ok(forward_to_upstream(&state, FAQ_ENDPOINT, payload).await)
}
