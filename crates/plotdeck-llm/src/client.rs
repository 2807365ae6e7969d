//! HTTP client for the chat-completions upstream.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::error::LlmError;
use crate::sse::relay_sse_stream;

/// Budget for a buffered completion.
const COMPLETE_TIMEOUT: Duration = Duration::from_secs(30);
/// Budget for a streamed completion; spans the whole generation.
const STREAM_TIMEOUT: Duration = Duration::from_secs(60);

/// One message in a chat-completions conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

/// Lazy, finite, non-restartable sequence of incremental text tokens.
pub type TokenStream = ReceiverStream<String>;

/// Client for a fixed OpenAI-style chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl CompletionClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Buffered completion: waits for the full response and returns the
    /// first choice's message content.
    pub async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, LlmError> {
        debug!(model, n_messages = messages.len(), "sending completion request");

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .timeout(COMPLETE_TIMEOUT)
            .json(&serde_json::json!({
                "model": model,
                "messages": messages,
                "temperature": temperature,
            }))
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let body: serde_json::Value = response.json().await?;
        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| LlmError::MalformedResponse("no content in first choice".into()))
    }

    /// Streamed completion: returns a token stream backed by a relay
    /// task parsing the upstream SSE body. Dropping the stream cancels
    /// the relay and closes the upstream connection.
    pub async fn complete_stream(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<TokenStream, LlmError> {
        debug!(model, n_messages = messages.len(), "opening completion stream");

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .timeout(STREAM_TIMEOUT)
            .json(&serde_json::json!({
                "model": model,
                "messages": messages,
                "temperature": temperature,
                "stream": true,
            }))
            .send()
            .await?;

        let response = Self::check_status(response).await?;

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(relay_sse_stream(response.bytes_stream(), tx));
        Ok(ReceiverStream::new(rx))
    }

    /// Map upstream statuses onto the error taxonomy before touching the
    /// body.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(LlmError::Unauthorized);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LlmError::Upstream { status: status.as_u16(), detail });
        }
        Ok(response)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
    }

    #[test]
    fn request_body_shape_is_openai_compatible() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let body = serde_json::json!({
            "model": "gpt-4o-mini",
            "messages": messages,
            "temperature": 0.7,
        });
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
    }
}
