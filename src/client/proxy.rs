// src/client/proxy.rs
use async_trait::async_trait;
use thiserror::Error;

use crate::message::{ChatRequest, ChatResponse, ErrorResponse};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// Sends one user message to the chat endpoint and returns the reply text.
#[async_trait]
pub trait ProxyClient: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, ClientError>;
}

#[derive(Clone, Debug)]
pub struct HttpProxyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpProxyClient {
    pub fn new(server_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/api/gemini", server_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ProxyClient for HttpProxyClient {
    async fn send(&self, message: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&ChatRequest::new(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error)
                .unwrap_or_default();
            return Err(ClientError::Status { status: status.as_u16(), message });
        }

        let body: ChatResponse = response.json().await?;
        Ok(body.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_built_from_server_url() {
        assert_eq!(
            HttpProxyClient::new("http://localhost:3000/").endpoint(),
            "http://localhost:3000/api/gemini"
        );
        assert_eq!(
            HttpProxyClient::new(DEFAULT_SERVER_URL).endpoint(),
            "http://localhost:3000/api/gemini"
        );
    }
}
