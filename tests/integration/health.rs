//! Liveness endpoint integration tests
//!
//! - GET / - plain-text banner
//! - GET /health - JSON status
//! - GET /metrics - Prometheus exposition
//! - unknown paths - JSON 404

use axum::http::{header, StatusCode};
use serde_json::Value;

use crate::common::{HarnessOptions, RelayTestHarness};

#[tokio::test]
async fn test_root_returns_plain_text_banner() {
    let harness = RelayTestHarness::new().await;

    let response = harness.server.get("/").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "openai-relay is running");
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let harness = RelayTestHarness::new().await;

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["ok"], true);
    assert!(json["uptime"].as_f64().unwrap() >= 0.0);
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_does_not_need_relay_key_or_upstream() {
    let harness = RelayTestHarness::with_options(
        HarnessOptions::default().without_relay_key().without_openai_key(),
    )
    .await;

    harness.server.get("/health").await.assert_status_ok();
    assert_eq!(harness.openai.request_count().await, 0);
}

#[tokio::test]
async fn test_metrics_endpoint_is_reachable() {
    let harness = RelayTestHarness::new().await;

    harness.server.get("/metrics").await.assert_status_ok();
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let harness = RelayTestHarness::new().await;

    let response = harness.server.get("/api/unknown").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json: Value = response.json();
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].as_str().unwrap().contains("/api/unknown"));
}
