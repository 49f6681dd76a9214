pub mod health;
pub mod notification;
pub mod webhook;

use crate::middleware;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Database webhook bodies are a single row; anything larger is not ours.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health / keepalive
        .route("/", get(health::root))
        .route("/wake-up", get(health::wake_up))
        .route("/health", get(health::health_check))
        // Database webhook
        .route("/webhook/attendance", post(webhook::attendance))
        // Token supplied by the caller
        .route("/notify/attendance", post(notification::attendance))
        // Middleware layers (applied top-down)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(
                    middleware::security_headers::security_headers,
                ))
                .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES)),
        )
        .with_state(state)
}
