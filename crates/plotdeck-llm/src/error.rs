use thiserror::Error;

/// Failures talking to the completion API.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The upstream rejected the bearer token (HTTP 401).
    #[error("upstream unauthorized: check the configured API key")]
    Unauthorized,

    /// Any other non-200 upstream status.
    #[error("completion API error: {status} - {detail}")]
    Upstream { status: u16, detail: String },

    /// Connection failure or timeout; every call has a fixed budget and
    /// is attempted exactly once.
    #[error("completion API transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 200 response whose body did not contain the expected content.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}
