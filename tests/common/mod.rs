#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use futures::{StreamExt, stream};
use instigpt::routes::create_router;
use instigpt::services::upstream::{
    ChatBackend, ChatConfig, ChatSession, TextStream, UpstreamError,
};
use instigpt::state::AppState;

#[derive(Clone, Debug)]
pub enum Script {
    Chunks(Vec<&'static str>),
    FailCreate,
    FailSend,
    FailMidStream(Vec<&'static str>),
}

/// In-memory upstream that replays a fixed script and records what it was asked.
#[derive(Clone)]
pub struct ScriptedBackend {
    script: Script,
    created: Arc<AtomicUsize>,
    configs: Arc<Mutex<Vec<ChatConfig>>>,
    messages: Arc<Mutex<Vec<String>>>,
}

impl ScriptedBackend {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            created: Arc::new(AtomicUsize::new(0)),
            configs: Arc::new(Mutex::new(Vec::new())),
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn chunks(chunks: Vec<&'static str>) -> Self {
        Self::new(Script::Chunks(chunks))
    }

    pub fn sessions_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn configs(&self) -> Vec<ChatConfig> {
        self.configs.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ChatBackend for ScriptedBackend {
    fn create_chat(&self, config: ChatConfig) -> Result<Box<dyn ChatSession>, UpstreamError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.configs.lock().unwrap().push(config);
        if let Script::FailCreate = self.script {
            return Err(UpstreamError::Api("session refused".into()));
        }
        Ok(Box::new(ScriptedSession {
            script: self.script.clone(),
            messages: self.messages.clone(),
        }))
    }
}

struct ScriptedSession {
    script: Script,
    messages: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ChatSession for ScriptedSession {
    async fn send_message_stream(&mut self, message: &str) -> Result<TextStream, UpstreamError> {
        self.messages.lock().unwrap().push(message.to_string());
        match &self.script {
            Script::Chunks(chunks) => {
                let items: Vec<Result<String, UpstreamError>> =
                    chunks.iter().map(|c| Ok(c.to_string())).collect();
                Ok(stream::iter(items).boxed())
            }
            Script::FailMidStream(chunks) => {
                let mut items: Vec<Result<String, UpstreamError>> =
                    chunks.iter().map(|c| Ok(c.to_string())).collect();
                items.push(Err(UpstreamError::Api("stream dropped".into())));
                Ok(stream::iter(items).boxed())
            }
            Script::FailSend => Err(UpstreamError::Status {
                status: 503,
                body: "overloaded".into(),
            }),
            Script::FailCreate => unreachable!("session was never created"),
        }
    }
}

pub fn app_with(backend: ScriptedBackend) -> axum::Router {
    let state = Arc::new(AppState::new(Arc::new(backend), ChatConfig::default()));
    create_router().with_state(state)
}
