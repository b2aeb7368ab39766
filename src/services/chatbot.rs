// src/services/chatbot.rs
use futures::TryStreamExt;

use super::upstream::{ChatBackend, ChatConfig, UpstreamError};

/// Runs one stateless exchange: fresh session, one message, full drain.
///
/// Fragments are concatenated in arrival order and the result is trimmed.
/// Any failure discards whatever was received so far.
pub async fn generate_reply(
    backend: &dyn ChatBackend,
    config: &ChatConfig,
    user_msg: &str,
) -> Result<String, UpstreamError> {
    let mut chat = backend.create_chat(config.clone())?;
    let stream = chat.send_message_stream(user_msg).await?;

    let reply = stream
        .try_fold(String::new(), |mut acc, fragment| async move {
            acc.push_str(&fragment);
            Ok(acc)
        })
        .await?;

    Ok(reply.trim().to_string())
}
