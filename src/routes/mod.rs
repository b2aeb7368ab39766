// src/routes/mod.rs
pub mod chat;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use chat::chat_handler;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    create_router_with_assets(crate::config::DEFAULT_PUBLIC_DIR)
}

pub fn create_router_with_assets(public_dir: &str) -> Router<SharedState> {
    Router::new()
        .route("/api/gemini", post(chat_handler))
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
}
