//! Header utilities for upstream calls
//!
//! Outbound requests carry only the relay's own credential and content type.
//! Caller headers, including `X-Relay-Key`, are never forwarded.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{AppError, AppResult};

/// Build the headers for a request to the upstream provider
pub fn build_default_headers(api_key: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key)).map_err(|_| {
        AppError::Internal(anyhow::anyhow!(
            "OPENAI_API_KEY contains characters not allowed in a header"
        ))
    })?;
    bearer.set_sensitive(true);

    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}
