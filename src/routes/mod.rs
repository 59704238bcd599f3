//! HTTP routes for the relay
//!
//! This module defines all HTTP endpoints exposed by the relay.

pub mod chat;
pub mod faq;
pub mod health;
pub mod metrics;
pub mod relay;

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::Uri,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer,
};

use crate::{
    error::AppError,
    middleware::{auth::relay_auth_middleware, origin::origin_guard},
    AppState,
};

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Relay endpoints: the relay key is checked before the handler runs
    let protected_routes = Router::new()
        .route(chat::CHAT_ENDPOINT, post(chat::relay_chat))
        .route(faq::FAQ_ENDPOINT, post(faq::relay_faq))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            relay_auth_middleware,
        ));

    // Public routes - no relay key required
    let public_routes = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route(chat::CHAT_ENDPOINT, get(chat::chat_usage));

    // Layers run outermost-last: trace, compression, origin guard, panic
    // catcher, then the route itself. The origin guard also covers the
    // fallback so OPTIONS on any path is answered.
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn_with_state(state.clone(), origin_guard))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
