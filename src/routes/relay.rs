//! Shared plumbing for the relay endpoints
//!
//! Reads the capped request body and drives one shaped payload through the
//! upstream caller and the response translator.

use axum::{body::Body, extract::Request, http::Response};
use bytes::Bytes;
use http_body_util::LengthLimitError;

use crate::{
    error::{AppError, AppResult},
    proxy::{logging::RequestContext, payload::UpstreamPayload, response::translate},
    routes::metrics::{record_request, record_upstream_failure},
    AppState,
};

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

fn is_length_limit(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}

/// Collect the request body, enforcing `MAX_BODY_BYTES`
pub async fn read_body(request: Request) -> AppResult<Bytes> {
    axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|e| {
            if is_length_limit(&e) {
                AppError::PayloadTooLarge {
                    limit: MAX_BODY_BYTES,
                }
            } else {
                AppError::BadRequest(format!("Failed to read request body: {}", e))
            }
        })
}

/// Send `payload` upstream and build the outward response.
///
/// Always produces a response; local failures are translated, not propagated.
pub async fn forward_to_upstream(
    state: &AppState,
    endpoint: &'static str,
    payload: UpstreamPayload,
) -> Response<Body> {
    let ctx = RequestContext::new(state.upstream.provider_name(), endpoint)
        .with_model(payload.model.clone())
        .with_messages(payload.messages.len());
    ctx.log_request_start();

    let result = state.upstream.call(&payload).await;

    match &result {
        Ok(reply) => ctx.log_upstream_response(reply.status.as_u16(), reply.body.len()),
        Err(AppError::UpstreamTimeout { timeout_ms }) => {
            record_upstream_failure("timeout");
            ctx.log_timeout(*timeout_ms);
        }
        Err(AppError::UpstreamUnreachable(detail)) => {
            record_upstream_failure("unreachable");
            ctx.log_connection_error(detail);
        }
        Err(e) => ctx.log_error(&e.to_string()),
    }

    let response = translate(result);
    let status = response.status().as_u16();
    ctx.log_complete(status);
    record_request(endpoint, status, ctx.elapsed_secs());
    response
}
