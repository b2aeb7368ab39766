// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorResponse;
use crate::services::upstream::UpstreamError;

pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const FETCH_FAILED: &str = "Failed to fetch response";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("malformed request body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            // Detail stays in the server log; the caller only sees the generic message.
            AppError::MalformedBody(_) | AppError::Upstream(_) => {
                tracing::error!(error = %self, "chat request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
