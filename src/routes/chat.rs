// src/routes/chat.rs
use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;

use crate::{
    error::{AppError, MESSAGE_REQUIRED},
    message::{ChatRequest, ChatResponse},
    services::chatbot::generate_reply,
    state::SharedState,
};

// The body is decoded by hand so requests without a JSON content type are still accepted.
pub async fn chat_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    let payload: ChatRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::MalformedBody(e.to_string()))?;

    let message = required_message(payload.message)?;

    tracing::debug!(chars = message.chars().count(), "forwarding chat message");

    let reply = generate_reply(state.backend.as_ref(), &state.chat_config, &message).await?;

    Ok(Json(ChatResponse { reply }))
}

/// Absent, `null`, `false`, `0` and `""` all count as no message.
fn required_message(value: Option<Value>) -> Result<String, AppError> {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => {
            Err(AppError::BadRequest(MESSAGE_REQUIRED.to_string()))
        }
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {
            Err(AppError::BadRequest(MESSAGE_REQUIRED.to_string()))
        }
        Some(Value::String(s)) if s.is_empty() => {
            Err(AppError::BadRequest(MESSAGE_REQUIRED.to_string()))
        }
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(AppError::MalformedBody(format!(
            "message must be a string, got {other}"
        ))),
    }
}
