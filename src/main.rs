mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
#[cfg(test)]
mod test_support;

use crate::config::Config;
use crate::db::supabase::SupabaseDirectory;
use crate::services::fcm::FcmClient;
use crate::services::google_auth::TokenProvider;
use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sge_notifier=info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = Config::from_env()?;
    let port = config.port;

    tracing::info!(
        project_id = %config.firebase_project_id,
        credentials = config.firebase_credentials_base64.is_some(),
        "Starting SGE notification server on port {}",
        port
    );
    if config.firebase_credentials_base64.is_none() {
        tracing::warn!("FIREBASE_CREDENTIALS_BASE64 is not set; pushes will fail until it is");
    }

    // One pooled client for Supabase, OAuth and FCM
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let directory = SupabaseDirectory::new(
        http.clone(),
        &config.supabase_url,
        &config.supabase_service_key,
    );
    let tokens = TokenProvider::new(http.clone(), config.firebase_credentials_base64.clone());
    let notifier = FcmClient::new(
        http,
        &config.fcm_base_url,
        &config.firebase_project_id,
        tokens,
    );

    let state = AppState::new(config, Arc::new(directory), Arc::new(notifier));

    // Init health tracking
    routes::health::init_start_time();

    // Build router
    let app = routes::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Listening on 0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
