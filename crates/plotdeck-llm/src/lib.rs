//! Completion client and prompt composition for plotdeck.
//!
//! One upstream: an OpenAI-style chat-completions endpoint. Two response
//! modes: buffered (`complete`) and token-streamed (`complete_stream`).
//! No retries anywhere; a single upstream failure surfaces directly to
//! the caller.

mod client;
mod error;
mod model;
pub mod prompt;
mod sse;

pub use client::{ChatMessage, CompletionClient, TokenStream};
pub use error::LlmError;
pub use model::{resolve_model, DEFAULT_MODEL_ALIAS};
pub use sse::{parse_sse_line, SseLine};

pub type Result<T> = std::result::Result<T, LlmError>;
