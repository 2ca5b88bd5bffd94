use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("chat request failed with http status {0}")]
    Http(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected chat response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub role: WireRole,
    pub content: String,
}

/// Completion side of the chat backend. Only the client call lives here; the
/// backend itself is an external collaborator.
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, messages: &[OutgoingMessage]) -> Result<String, BackendError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: &'a [OutgoingMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    result: ChatResult,
}

#[derive(Debug, Deserialize)]
struct ChatResult {
    content: String,
}

#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpChatBackend {
    pub fn new(
        base_url: String,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|err| BackendError::Network(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ChatBackend for HttpChatBackend {
    async fn complete(&self, messages: &[OutgoingMessage]) -> Result<String, BackendError> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&ChatRequest { messages })
            .send()
            .await
            .map_err(|err| BackendError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Http(status.as_u16()));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| BackendError::Decode(err.to_string()))?;
        Ok(body.result.content)
    }
}
