//! Request / response shapes for the chat and chart routes.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct LlmChatQuery {
    /// What to visualize, in natural language.
    pub prompt: String,
    /// Request-facing dataset name.
    pub dataset: String,
    /// Model alias; unknown aliases fall back to the default.
    pub model: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LlmChatResponse {
    pub reply: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// The sanitized code that was evaluated, for display to the caller.
    pub code_used: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct TextChatQuery {
    pub prompt: String,
    /// Optional dataset to ground the reply in.
    pub dataset: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TextChatResponse {
    /// Markdown flattened to plain text.
    pub reply: String,
    /// The upstream reply exactly as received.
    pub raw_markdown: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StreamChatQuery {
    pub prompt: String,
    pub dataset: Option<String>,
    /// Reply language; `ar` forces Arabic-only replies.
    pub lang: Option<String>,
}
