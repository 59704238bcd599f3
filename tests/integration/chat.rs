//! Chat relay integration tests
//!
//! - POST /api/chat - shaping, pass-through of upstream status and body
//! - Upstream failures (timeout, unreachable, non-JSON bodies)
//! - GET /api/chat - usage hint

use std::time::{Duration, Instant};

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{
    constants::{TEST_DEFAULT_MODEL, TEST_OPENAI_API_KEY, TEST_RELAY_KEY},
    relay_key, relay_key_header_name, test_data, HarnessOptions, RelayTestHarness,
};
use crate::mocks::MockOpenAI;

async fn post_chat(harness: &RelayTestHarness, body: &Value) -> axum_test::TestResponse {
    harness
        .server
        .post("/api/chat")
        .add_header(relay_key_header_name(), relay_key(TEST_RELAY_KEY))
        .json(body)
        .await
}

#[tokio::test]
async fn test_chat_success_returns_upstream_body() {
    let harness = RelayTestHarness::new().await;
    harness.openai.mock_chat_completion_success("Hello! How can I help you today?").await;

    let response = post_chat(&harness, &test_data::minimal_chat_request()).await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json, MockOpenAI::completion_body("Hello! How can I help you today?"));
    assert_eq!(harness.openai.request_count().await, 1);
}

#[tokio::test]
async fn test_minimal_chat_payload_has_only_defaults() {
    let harness = RelayTestHarness::new().await;
    harness.openai.mock_chat_completion_success("ok").await;

    post_chat(&harness, &test_data::minimal_chat_request())
        .await
        .assert_status_ok();

    assert_eq!(
        harness.openai.last_request_body().await,
        json!({
            "model": TEST_DEFAULT_MODEL,
            "messages": [{ "role": "user", "content": "hi" }],
            "temperature": 0.7
        })
    );
}

#[tokio::test]
async fn test_full_chat_payload_is_forwarded() {
    let harness = RelayTestHarness::new().await;
    harness.openai.mock_chat_completion_success("ok").await;

    post_chat(&harness, &test_data::full_chat_request())
        .await
        .assert_status_ok();

    assert_eq!(harness.openai.last_request_body().await, test_data::full_chat_request());
}

#[tokio::test]
async fn test_zero_max_tokens_reaches_upstream() {
    let harness = RelayTestHarness::new().await;
    harness.openai.mock_chat_completion_success("ok").await;

    post_chat(&harness, &json!({ "messages": [], "max_tokens": 0 }))
        .await
        .assert_status_ok();

    let sent = harness.openai.last_request_body().await;
    assert_eq!(sent["max_tokens"], json!(0));
    assert_eq!(sent["messages"], json!([]));
}

#[tokio::test]
async fn test_unknown_fields_and_caller_headers_are_not_forwarded() {
    let harness = RelayTestHarness::new().await;
    harness.openai.mock_chat_completion_success("ok").await;

    post_chat(
        &harness,
        &json!({
            "messages": [{ "role": "user", "content": "hi" }],
            "stream": true,
            "api_key": "sk-from-browser"
        }),
    )
    .await
    .assert_status_ok();

    let requests = harness.openai.received_requests().await;
    let request = requests.last().unwrap();
    let sent: Value = serde_json::from_slice(&request.body).unwrap();
    assert!(sent.get("stream").is_none());
    assert!(sent.get("api_key").is_none());

    assert!(request.headers.get("x-relay-key").is_none());
    assert_eq!(
        request.headers.get("authorization").unwrap().to_str().unwrap(),
        format!("Bearer {}", TEST_OPENAI_API_KEY)
    );
}

#[tokio::test]
async fn test_upstream_429_passes_through_verbatim() {
    let harness = RelayTestHarness::new().await;
    harness
        .openai
        .mock_raw_response(429, r#"{"error":"rate_limited"}"#)
        .await;

    let response = post_chat(&harness, &test_data::minimal_chat_request()).await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.text(), r#"{"error":"rate_limited"}"#);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_upstream_401_is_not_reinterpreted() {
    let harness = RelayTestHarness::new().await;
    let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#;
    harness.openai.mock_raw_response(401, body).await;

    let response = post_chat(&harness, &test_data::minimal_chat_request()).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.text(), body);
}

#[tokio::test]
async fn test_non_json_upstream_body_is_wrapped() {
    let harness = RelayTestHarness::new().await;
    harness
        .openai
        .mock_raw_response(502, "<html>upstream proxy error</html>")
        .await;

    let response = post_chat(&harness, &test_data::minimal_chat_request()).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert_eq!(json, json!({ "raw": "<html>upstream proxy error</html>" }));
}

#[tokio::test]
async fn test_upstream_timeout_returns_structured_error() {
    let harness = RelayTestHarness::with_options(
        HarnessOptions::default().with_timeout(Duration::from_millis(200)),
    )
    .await;
    harness.openai.mock_slow_completion(Duration::from_secs(3)).await;

    let started = Instant::now();
    let response = post_chat(&harness, &test_data::minimal_chat_request()).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["code"], "UPSTREAM_TIMEOUT");
    assert!(json["error"].as_str().unwrap().contains("200 ms"));
    assert!(!response.text().contains(TEST_OPENAI_API_KEY));
    // Single attempt, no retry after the timeout
    assert_eq!(harness.openai.request_count().await, 1);
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let harness = RelayTestHarness::new().await;

    let response = harness
        .server
        .post("/api/chat")
        .add_header(relay_key_header_name(), relay_key(TEST_RELAY_KEY))
        .text("{not json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(harness.openai.request_count().await, 0);
}

#[tokio::test]
async fn test_missing_messages_is_400() {
    let harness = RelayTestHarness::new().await;

    let response = post_chat(&harness, &json!({ "model": "gpt-4o" })).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(harness.openai.request_count().await, 0);
}

#[tokio::test]
async fn test_oversized_body_is_413() {
    let harness = RelayTestHarness::new().await;
    let huge = "a".repeat(1024 * 1024 + 1);

    let response = post_chat(
        &harness,
        &json!({ "messages": [{ "role": "user", "content": huge }] }),
    )
    .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let json: Value = response.json();
    assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(harness.openai.request_count().await, 0);
}

#[tokio::test]
async fn test_get_chat_returns_usage_example() {
    let harness = RelayTestHarness::new().await;

    let response = harness.server.get("/api/chat").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    let json: Value = response.json();
    assert_eq!(json["note"], "Use POST with JSON and X-Relay-Key");
    assert_eq!(json["example"]["method"], "POST");
    assert!(json["example"]["headers"].get("X-Relay-Key").is_some());
    assert!(json["example"]["body"]["messages"].is_array());
}
