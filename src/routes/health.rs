//! Liveness endpoints
//!
//! - `/` - plain-text banner
//! - `/health` - JSON status with uptime

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Seconds since the relay started
    pub uptime: f64,
    pub version: &'static str,
    pub timestamp: String,
}

/// Root banner
pub async fn root() -> &'static str {
    "openai-relay is running"
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        uptime: state.start_time.elapsed().as_secs_f64(),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
