//! Origin guard middleware
//!
//! Decides whether a request's declared `Origin` may use the relay, answers
//! preflights directly and stamps the CORS headers on every response.
//!
//! Policy:
//! - `ALLOWED_ORIGINS=*`: every request is allowed and answered with
//!   `Access-Control-Allow-Origin: *`.
//! - Fixed list: the origin must match an entry exactly; the matching origin
//!   is echoed back together with `Vary: Origin`.
//! - No `Origin` header under a fixed list: preflights are denied, other
//!   requests follow `Config::allow_missing_origin`.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, Response, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use tracing::{debug, warn};

use crate::{
    config::{AllowedOrigins, Config},
    error::AppError,
    routes::metrics::record_rejection,
    AppState,
};

pub const ALLOWED_METHODS: &str = "GET,POST,OPTIONS";
pub const ALLOWED_HEADERS: &str = "content-type, authorization, x-relay-key";
pub const PREFLIGHT_MAX_AGE: &str = "86400";

/// Outcome of the origin check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    Allow {
        /// Value for `Access-Control-Allow-Origin`, if any
        allow_origin: Option<HeaderValue>,
        /// Whether the response depends on the request's origin
        vary: bool,
    },
    Deny,
}

impl OriginDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }
}

/// Decide whether `origin` may use the relay
pub fn evaluate_origin(config: &Config, origin: Option<&str>, preflight: bool) -> OriginDecision {
    match (&config.allowed_origins, origin) {
        (AllowedOrigins::Any, _) => OriginDecision::Allow {
            allow_origin: Some(HeaderValue::from_static("*")),
            vary: false,
        },
        (AllowedOrigins::List(_), Some(origin)) if config.allowed_origins.contains(origin) => {
            match HeaderValue::from_str(origin) {
                Ok(value) => OriginDecision::Allow {
                    allow_origin: Some(value),
                    vary: true,
                },
                Err(_) => OriginDecision::Deny,
            }
        }
        (AllowedOrigins::List(_), Some(_)) => OriginDecision::Deny,
        (AllowedOrigins::List(_), None) if !preflight && config.allow_missing_origin => {
            OriginDecision::Allow {
                allow_origin: None,
                vary: true,
            }
        }
        (AllowedOrigins::List(_), None) => OriginDecision::Deny,
    }
}

/// Write the CORS response headers for `decision`
pub fn apply_cors_headers(headers: &mut HeaderMap, decision: &OriginDecision, fixed_list: bool) {
    if let OriginDecision::Allow {
        allow_origin: Some(value),
        ..
    } = decision
    {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value.clone());
    }
    if fixed_list {
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
    );
}

/// Origin guard middleware
///
/// Runs in front of every route. Preflights never reach a handler, and a
/// denied real request never reaches the auth gate.
pub async fn origin_guard(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response<Body> {
    // A present but non-UTF-8 header can never match a configured origin
    let origin: Option<String> = request
        .headers()
        .get(header::ORIGIN)
        .map(|v| v.to_str().unwrap_or_default().to_string());
    let preflight = request.method() == Method::OPTIONS;
    let decision = evaluate_origin(&state.config, origin.as_deref(), preflight);

    let mut response = if preflight {
        debug!(origin = ?origin, allowed = decision.is_allowed(), "Answering preflight");
        let status = if decision.is_allowed() {
            StatusCode::NO_CONTENT
        } else {
            record_rejection("origin");
            StatusCode::FORBIDDEN
        };
        let mut response = Response::new(Body::empty());
        *response.status_mut() = status;
        response
    } else if decision.is_allowed() {
        next.run(request).await
    } else {
        warn!(origin = ?origin, path = %request.uri().path(), "Rejected request from disallowed origin");
        record_rejection("origin");
        AppError::OriginRejected.into_response()
    };

    apply_cors_headers(
        response.headers_mut(),
        &decision,
        !state.config.allowed_origins.is_wildcard(),
    );
    response
}
