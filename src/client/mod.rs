// src/client/mod.rs
//! Chat view state: message list, draft input and the one-at-a-time submit cycle.

pub mod proxy;
pub mod render;

use crate::message::Message;
use proxy::{ClientError, ProxyClient};

pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process that request.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
}

/// Where the view should scroll after the message list changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollRequest {
    pub index: usize,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Default)]
pub struct ChatView {
    messages: Vec<Message>,
    draft: String,
    is_submitting: bool,
    pending_scroll: Option<ScrollRequest>,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Submit affordance: disabled while a request is in flight or the draft is blank.
    pub fn can_submit(&self) -> bool {
        !self.is_submitting && !self.draft.trim().is_empty()
    }

    pub fn shows_welcome(&self) -> bool {
        self.messages.is_empty()
    }

    /// Moves the draft into the list as a user message and returns the text to send.
    pub fn begin_submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        let text = std::mem::take(&mut self.draft);
        self.push(Message::user(text.clone()));
        self.is_submitting = true;
        Some(text)
    }

    pub fn finish_submit(&mut self, result: Result<String, ClientError>) {
        if !self.is_submitting {
            tracing::warn!("reply arrived with no submission in flight; dropped");
            return;
        }
        match result {
            Ok(reply) => self.push(Message::assistant(reply)),
            Err(err) => {
                tracing::error!(error = %err, "chat error");
                self.push(Message::assistant(FALLBACK_REPLY));
            }
        }
        self.is_submitting = false;
    }

    /// Runs one full submission against `client`. Returns false when the submit was a no-op.
    pub async fn submit<C>(&mut self, client: &C) -> bool
    where
        C: ProxyClient + ?Sized,
    {
        let Some(text) = self.begin_submit() else {
            return false;
        };
        let result = client.send(&text).await;
        self.finish_submit(result);
        true
    }

    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.pending_scroll.take()
    }

    fn push(&mut self, message: Message) {
        debug_assert!(
            self.messages.last().map(|m| m.role) != Some(message.role),
            "roles must alternate"
        );
        self.messages.push(message);
        self.pending_scroll = Some(ScrollRequest {
            index: self.messages.len() - 1,
            behavior: ScrollBehavior::Smooth,
        });
    }
}
