// src/client/render.rs
use std::ops::RangeInclusive;

use super::ChatView;
use crate::message::{Message, MessageRole};

pub const WELCOME_TITLE: &str = "Welcome to InstiGPT";
pub const WELCOME_BODY: &str =
    "Ask me anything about campus life, academic programs, or institute policies.";
pub const INPUT_PLACEHOLDER: &str = "Ask something about IIT Madras...";

pub fn welcome_panel() -> String {
    format!("{WELCOME_TITLE}\n{WELCOME_BODY}\n")
}

pub fn role_label(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "You",
        MessageRole::Assistant => "InstiGPT",
    }
}

pub fn render_message(message: &Message) -> String {
    format!("{}: {}\n", role_label(message.role), message.content)
}

pub fn render_range(messages: &[Message], range: RangeInclusive<usize>) -> String {
    messages
        .get(range)
        .unwrap_or_default()
        .iter()
        .map(render_message)
        .collect()
}

/// Full view: welcome panel when empty, otherwise the message list.
pub fn render(view: &ChatView) -> String {
    let mut out = if view.shows_welcome() {
        welcome_panel()
    } else {
        view.messages().iter().map(render_message).collect()
    };
    if view.is_submitting() {
        out.push_str("...\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_view_shows_welcome() {
        let view = ChatView::new();
        let out = render(&view);
        assert!(out.contains(WELCOME_TITLE));
        assert!(out.contains("campus life"));
    }

    #[test]
    fn messages_replace_welcome() {
        let mut view = ChatView::new();
        view.set_draft("hello");
        view.begin_submit();
        view.finish_submit(Ok("hi there".into()));
        let out = render(&view);
        assert!(!out.contains(WELCOME_TITLE));
        assert!(out.contains("You: hello"));
        assert!(out.contains("InstiGPT: hi there"));
    }

    #[test]
    fn out_of_range_renders_nothing() {
        let messages = vec![Message::user("a")];
        assert_eq!(render_range(&messages, 3..=4), "");
        assert_eq!(render_range(&messages, 0..=0), "You: a\n");
    }

    #[test]
    fn both_roles_share_one_layout() {
        let messages = vec![Message::user("a"), Message::assistant("b")];
        assert_eq!(render_range(&messages, 0..=1), "You: a\nInstiGPT: b\n");
    }
}
