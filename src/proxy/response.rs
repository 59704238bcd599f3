//! Response translation
//!
//! Upstream answers keep their status code. A JSON body is returned
//! byte-for-byte; anything else is wrapped as `{"raw": "<text>"}`.

use axum::{
    body::Body,
    http::{header, Response},
    response::IntoResponse,
    Json,
};
use serde::de::IgnoredAny;
use serde_json::json;

use crate::{error::AppResult, proxy::provider::UpstreamReply};

/// Turn the outcome of an upstream call into the relay's response
pub fn translate(result: AppResult<UpstreamReply>) -> Response<Body> {
    match result {
        Ok(reply) => passthrough(reply),
        Err(e) => e.into_response(),
    }
}

fn passthrough(reply: UpstreamReply) -> Response<Body> {
    let is_json = serde_json::from_str::<IgnoredAny>(&reply.body).is_ok();

    if is_json {
        let mut response = Response::new(Body::from(reply.body));
        *response.status_mut() = reply.status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        response
    } else {
        (reply.status, Json(json!({ "raw": reply.body }))).into_response()
    }
}
