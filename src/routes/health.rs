use crate::models::HealthResponse;
use axum::Json;

static START_TIME: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

pub fn init_start_time() {
    START_TIME.get_or_init(std::time::Instant::now);
}

/// GET /
pub async fn root() -> &'static str {
    "SGE Notification Backend is Running 🚀"
}

/// GET /wake-up: Pinged by an external scheduler to keep the instance warm.
pub async fn wake_up() -> &'static str {
    tracing::info!("I am awake!");
    "Awake"
}

pub async fn health_check() -> Json<HealthResponse> {
    let uptime = START_TIME
        .get()
        .map(|t| t.elapsed().as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: uptime,
    })
}
