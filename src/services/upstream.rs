// src/services/upstream.rs
use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::config::{DEFAULT_MODEL, SYSTEM_INSTRUCTION};
use crate::message::Message;

/// Lazy, finite sequence of reply fragments. Not restartable.
pub type TextStream = BoxStream<'static, Result<String, UpstreamError>>;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream reported an error: {0}")]
    Api(String),

    #[error("could not decode upstream payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Fixed configuration a chat session is created with.
#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub model: String,
    pub system_instruction: String,
    pub history: Vec<Message>,
}

impl ChatConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            history: Vec::new(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

pub trait ChatBackend: Send + Sync {
    fn create_chat(&self, config: ChatConfig) -> Result<Box<dyn ChatSession>, UpstreamError>;
}

#[async_trait]
pub trait ChatSession: Send {
    async fn send_message_stream(&mut self, message: &str) -> Result<TextStream, UpstreamError>;
}
