use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use instigpt::config::{Config, mask_secret};
use instigpt::routes;
use instigpt::services::gemini::GeminiClient;
use instigpt::services::upstream::ChatConfig;
use instigpt::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::info!(api_key = %mask_secret(&config.api_key), model = %config.model, "GEMINI_API_KEY loaded");

    let backend = GeminiClient::with_base_url(config.api_key.clone(), config.base_url.clone());
    let state = Arc::new(AppState::new(
        Arc::new(backend),
        ChatConfig::new(config.model.clone()),
    ));

    let cors = CorsLayer::very_permissive();

    let app = routes::create_router_with_assets(&config.public_dir)
        .with_state(state)
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("InstiGPT running at http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
