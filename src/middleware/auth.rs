//! Relay key authentication middleware
//!
//! Protected routes require the caller to present the shared relay key in
//! `X-Relay-Key`. Configuration problems are reported as 500 so they are not
//! mistaken for a caller's bad credential.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use tracing::{instrument, warn};

use crate::{
    error::{AppError, AppResult},
    routes::metrics::record_rejection,
    AppState,
};

/// Header carrying the caller's relay key
pub const RELAY_KEY_HEADER: &str = "x-relay-key";

/// Short, non-reversible identifier for a secret, safe to log
pub fn key_fingerprint(secret: &str) -> String {
    hex::encode(&Sha256::digest(secret.as_bytes())[..4])
}

/// Exact match of two secrets.
///
/// Both sides are hashed first so the comparison does not short-circuit on
/// the length of a matching prefix of the real key.
pub fn keys_match(expected: &str, supplied: &str) -> bool {
    Sha256::digest(expected.as_bytes()) == Sha256::digest(supplied.as_bytes())
}

/// Check a request's relay key against the configuration.
///
/// Order: relay key configured, caller key matches, upstream key configured.
pub fn check_relay_key(
    relay_key: Option<&str>,
    supplied: Option<&str>,
    upstream_configured: bool,
) -> AppResult<()> {
    let relay_key = relay_key.ok_or(AppError::Configuration("RELAY_KEY"))?;

    if !keys_match(relay_key, supplied.unwrap_or_default()) {
        return Err(AppError::Unauthorized);
    }

    if !upstream_configured {
        return Err(AppError::Configuration("OPENAI_API_KEY"));
    }

    Ok(())
}

/// Authentication middleware for the relay endpoints
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn relay_auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let supplied = request
        .headers()
        .get(RELAY_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    if let Err(e) = check_relay_key(
        state.config.relay_key.as_deref(),
        supplied,
        state.upstream.is_configured(),
    ) {
        match &e {
            AppError::Unauthorized => {
                warn!(key_present = supplied.is_some(), "Rejected request with invalid relay key");
                record_rejection("relay_key");
            }
            _ => warn!(error = %e, "Relay is misconfigured"),
        }
        return Err(e);
    }

    Ok(next.run(request).await)
}
