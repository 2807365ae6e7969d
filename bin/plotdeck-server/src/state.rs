//! Shared application state injected into every Axum handler.

use std::path::PathBuf;
use std::sync::Arc;

use plotdeck_dataset::DatasetStore;
use plotdeck_llm::CompletionClient;

use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::error::ServerError;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// CSV dataset store.
    pub store: DatasetStore,
    /// YAML-file credential store managed via `/config/openai-key`.
    pub credentials: CredentialStore,
}

impl AppState {
    /// Directory the chart artifacts are written to and served from.
    pub fn artifacts_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.artifacts_dir)
    }

    /// Resolve the upstream API key: process environment first, stored
    /// credential second. LLM endpoints fail fast when neither is set,
    /// before any upstream call.
    pub fn resolve_api_key(&self) -> Result<String, ServerError> {
        if let Some(key) = &self.config.api_key {
            return Ok(key.clone());
        }
        if let Some(key) = self.credentials.api_key()? {
            return Ok(key);
        }
        Err(ServerError::Configuration(
            "OpenAI API key not configured; set OPENAI_API_KEY or store one via POST /config/openai-key"
                .into(),
        ))
    }

    /// Completion client for the configured upstream.
    pub fn completion_client(&self) -> Result<CompletionClient, ServerError> {
        let key = self.resolve_api_key()?;
        Ok(CompletionClient::new(&self.config.api_url, key))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
