// src/state.rs
use std::sync::Arc;

use crate::services::upstream::{ChatBackend, ChatConfig};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub backend: Arc<dyn ChatBackend>,
    pub chat_config: ChatConfig,
}

impl AppState {
    pub fn new(backend: Arc<dyn ChatBackend>, chat_config: ChatConfig) -> Self {
        Self { backend, chat_config }
    }
}
