// src/services/gemini.rs
//! Gemini `streamGenerateContent` client.
//!
//! Each chat session posts its history plus the new user turn and reads the
//! reply back as server-sent events, one `GenerateContentResponse` per event.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures::{Stream, StreamExt, stream, stream::BoxStream};
use serde::{Deserialize, Serialize};

use super::upstream::{ChatBackend, ChatConfig, ChatSession, TextStream, UpstreamError};
use crate::config::{DEFAULT_BASE_URL, mask_secret};
use crate::message::{Message, MessageRole};

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &mask_secret(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, model
        )
    }
}

impl ChatBackend for GeminiClient {
    fn create_chat(&self, config: ChatConfig) -> Result<Box<dyn ChatSession>, UpstreamError> {
        if config.model.trim().is_empty() {
            return Err(UpstreamError::Api("model name is empty".to_string()));
        }

        let system_instruction = (!config.system_instruction.trim().is_empty())
            .then(|| Content::text(None, &config.system_instruction));

        Ok(Box::new(GeminiChat {
            client: self.clone(),
            model: config.model,
            system_instruction,
            history: config.history.iter().map(Content::from).collect(),
        }))
    }
}

pub struct GeminiChat {
    client: GeminiClient,
    model: String,
    system_instruction: Option<Content>,
    history: Vec<Content>,
}

#[async_trait]
impl ChatSession for GeminiChat {
    async fn send_message_stream(&mut self, message: &str) -> Result<TextStream, UpstreamError> {
        let mut contents = self.history.clone();
        contents.push(Content::text(Some("user"), message));

        let body = GenerateContentRequest {
            contents,
            system_instruction: self.system_instruction.clone(),
        };

        tracing::debug!(model = %self.model, turns = body.contents.len(), "opening gemini stream");

        let response = self
            .client
            .http
            .post(self.client.stream_url(&self.model))
            .header("x-goog-api-key", &self.client.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        Ok(sse_text_stream(response.bytes_stream()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text: Some(text.to_string()) }],
        }
    }
}

impl From<&Message> for Content {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            MessageRole::User => "user",
            MessageRole::Assistant => "model",
        };
        Content::text(Some(role), &message.content)
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GenerateContentResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn decode_event(payload: &str) -> Result<String, UpstreamError> {
    let response: GenerateContentResponse = serde_json::from_str(payload)?;
    if let Some(err) = response.error {
        return Err(UpstreamError::Api(format!(
            "{} {}: {}",
            err.code.map(|c| c.to_string()).unwrap_or_default(),
            err.status.unwrap_or_default(),
            err.message
        )));
    }
    Ok(response.text())
}

/// Splits a byte stream into server-sent event payloads.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
    /// Prefix of `buffer` already searched for a newline.
    scanned: usize,
    data: Vec<String>,
}

impl SseDecoder {
    fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);
        let mut events = Vec::new();
        let mut start = 0;
        let mut search_from = self.scanned;
        // Only complete lines are decoded, so multi-byte characters split across chunks survive.
        while let Some(offset) = self.buffer[search_from..].iter().position(|b| *b == b'\n') {
            let end = search_from + offset;
            let line = String::from_utf8_lossy(&self.buffer[start..end]).into_owned();
            self.push_line(line.trim_end_matches('\r'), &mut events);
            start = end + 1;
            search_from = start;
        }
        self.buffer.drain(..start);
        self.scanned = self.buffer.len();
        events
    }

    fn finish(&mut self) -> Option<String> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw).into_owned();
            self.push_line(line.trim_end_matches('\r'), &mut events);
        }
        self.scanned = 0;
        self.push_line("", &mut events);
        events.pop()
    }

    fn push_line(&mut self, line: &str, events: &mut Vec<String>) {
        if line.is_empty() {
            if !self.data.is_empty() {
                events.push(self.data.join("\n"));
                self.data.clear();
            }
            return;
        }
        if let Some(value) = line.strip_prefix("data:") {
            self.data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
        }
    }
}

struct SseState {
    inner: BoxStream<'static, Result<Vec<u8>, UpstreamError>>,
    decoder: SseDecoder,
    pending: VecDeque<Result<String, UpstreamError>>,
    done: bool,
}

/// Turns a raw SSE byte stream into reply fragments. The first error ends the stream.
pub(crate) fn sse_text_stream<S, B, E>(bytes: S) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<UpstreamError> + Send + 'static,
{
    let state = SseState {
        inner: bytes
            .map(|chunk| chunk.map(|b| b.as_ref().to_vec()).map_err(Into::<UpstreamError>::into))
            .boxed(),
        decoder: SseDecoder::default(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if let Some(item) = st.pending.pop_front() {
                if item.is_err() {
                    st.pending.clear();
                    st.done = true;
                }
                return Some((item, st));
            }
            if st.done {
                return None;
            }
            match st.inner.next().await {
                Some(Ok(bytes)) => {
                    for payload in st.decoder.feed(&bytes) {
                        st.pending.push_back(decode_event(&payload));
                    }
                }
                Some(Err(err)) => {
                    st.pending.push_back(Err(err));
                    st.done = true;
                }
                None => {
                    st.done = true;
                    if let Some(payload) = st.decoder.finish() {
                        st.pending.push_back(decode_event(&payload));
                    }
                }
            }
        }
    })
    .boxed()
}
