//! Chart-synthesis and chat routes.
//!
//! `/llm-chat` runs the full chart pipeline: compose the instruction
//! prompt, call the completion upstream, evaluate the returned code and
//! render the artifact (falling back to a default chart when the code
//! fails). `/text-chat` is a buffered relay grounded in the dataset
//! summary; `/text-chat/stream` relays tokens as they arrive. Dropping a
//! streaming response cancels the relay task and with it the upstream
//! connection.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, info};
use utoipa::OpenApi;

use plotdeck_chart::synthesize;
use plotdeck_dataset::summarize;
use plotdeck_llm::{
    prompt, resolve_model, ChatMessage, DEFAULT_MODEL_ALIAS,
};

use crate::error::ServerError;
use crate::markdown::markdown_to_plain;
use crate::schemas::chat::{
    LlmChatQuery, LlmChatResponse, StreamChatQuery, TextChatQuery, TextChatResponse,
};
use crate::state::AppState;

/// Chart-code generation runs cooler than conversation: code needs to
/// be deterministic enough to evaluate, chat should stay varied.
const CHART_TEMPERATURE: f32 = 0.3;
const CHAT_TEMPERATURE: f32 = 0.7;

#[derive(OpenApi)]
#[openapi(
    paths(llm_chat, text_chat, text_chat_stream),
    components(schemas(LlmChatResponse, TextChatResponse))
)]
pub struct ChatApi;

/// Register chat routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/llm-chat", post(llm_chat))
        .route("/text-chat", post(text_chat))
        .route("/text-chat/stream", post(text_chat_stream))
}

/// Generate a chart from a natural-language request (`POST /llm-chat`).
///
/// The dataset must exist; the model alias is resolved with an
/// unknown-alias fallback. The response carries the artifact URL and the
/// code that was evaluated.
#[utoipa::path(
    post,
    path = "/llm-chat",
    tag = "chat",
    params(LlmChatQuery),
    responses(
        (status = 200, description = "Chart generated", body = LlmChatResponse),
        (status = 404, description = "Dataset not found"),
        (status = 401, description = "Upstream rejected the API key"),
        (status = 502, description = "Upstream failure"),
        (status = 500, description = "Generated and fallback plots both failed"),
    )
)]
pub async fn llm_chat(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LlmChatQuery>,
) -> Result<Json<LlmChatResponse>, ServerError> {
    let table = state.store.load(&query.dataset)?;
    let client = state.completion_client()?;
    let model = resolve_model(query.model.as_deref().unwrap_or(DEFAULT_MODEL_ALIAS));

    debug!(dataset = %query.dataset, model, "chart request");

    let messages = [
        ChatMessage::system(prompt::chart_system_message()),
        ChatMessage::user(prompt::chart_prompt(&query.prompt)),
    ];
    let raw = client.complete(model, &messages, CHART_TEMPERATURE).await?;

    let result = synthesize(&raw, &table, &state.artifacts_dir())?;
    info!(
        dataset = %query.dataset,
        file = %result.filename,
        used_fallback = result.used_fallback,
        "chart synthesized"
    );

    let reply = if result.used_fallback {
        "The generated code failed to run; a default chart of the dataset was rendered instead."
            .to_owned()
    } else {
        format!("Here is the chart for: {}", query.prompt)
    };

    Ok(Json(LlmChatResponse {
        reply,
        image_url: format!("/plot/{}", result.filename),
        code_used: result.code,
    }))
}

/// Buffered chat grounded in a dataset summary (`POST /text-chat`).
///
/// A missing or unreadable dataset does not fail the request; the model
/// is told the load failed and the chat degrades gracefully.
#[utoipa::path(
    post,
    path = "/text-chat",
    tag = "chat",
    params(TextChatQuery),
    responses(
        (status = 200, description = "Reply generated", body = TextChatResponse),
        (status = 401, description = "Upstream rejected the API key"),
        (status = 502, description = "Upstream failure"),
    )
)]
pub async fn text_chat(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TextChatQuery>,
) -> Result<Json<TextChatResponse>, ServerError> {
    let client = state.completion_client()?;
    let messages = chat_messages(&state, &query.prompt, query.dataset.as_deref(), "en");

    let raw_markdown = client
        .complete(resolve_model(DEFAULT_MODEL_ALIAS), &messages, CHAT_TEMPERATURE)
        .await?;
    let reply = markdown_to_plain(&raw_markdown);

    Ok(Json(TextChatResponse { reply, raw_markdown }))
}

/// Token-streamed chat (`POST /text-chat/stream`).
///
/// The response body is `text/plain`, one upstream token per chunk.
#[utoipa::path(
    post,
    path = "/text-chat/stream",
    tag = "chat",
    params(StreamChatQuery),
    responses(
        (status = 200, description = "Token stream", content_type = "text/plain"),
        (status = 401, description = "Upstream rejected the API key"),
        (status = 502, description = "Upstream failure"),
    )
)]
pub async fn text_chat_stream(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StreamChatQuery>,
) -> Result<Response, ServerError> {
    let client = state.completion_client()?;
    let lang = query.lang.as_deref().unwrap_or("en");
    let messages = chat_messages(&state, &query.prompt, query.dataset.as_deref(), lang);

    let tokens = client
        .complete_stream(resolve_model(DEFAULT_MODEL_ALIAS), &messages, CHAT_TEMPERATURE)
        .await?;

    let body = Body::from_stream(tokens.map(|t| Ok::<Bytes, Infallible>(Bytes::from(t))));
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response())
}

/// Compose the system and user messages for a chat turn, grounding the
/// system message in the dataset summary when one is in scope.
fn chat_messages(
    state: &AppState,
    user_prompt: &str,
    dataset: Option<&str>,
    lang: &str,
) -> Vec<ChatMessage> {
    let mut summary = None;
    let mut load_error = None;

    if let Some(name) = dataset {
        match state.store.load(name) {
            Ok(table) => summary = Some(summarize(&table)),
            Err(e) => {
                debug!(dataset = %name, error = %e, "dataset unavailable for chat grounding");
                load_error = Some((name.to_owned(), e.to_string()));
            }
        }
    }

    let system = prompt::chat_system_message(
        lang,
        summary.as_deref(),
        load_error.as_ref().map(|(n, e)| (n.as_str(), e.as_str())),
    );
    let user = prompt::chat_user_message(user_prompt, dataset);

    vec![ChatMessage::system(system), ChatMessage::user(user)]
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::credentials::CredentialStore;

    fn state(dir: &std::path::Path) -> Arc<AppState> {
        let config = Config {
            bind_address: "127.0.0.1:0".into(),
            data_dir: dir.join("data").to_string_lossy().into_owned(),
            artifacts_dir: dir.join("plots").to_string_lossy().into_owned(),
            api_url: "http://localhost/none".into(),
            api_key: None,
            credentials_path: dir.join("creds.yaml").to_string_lossy().into_owned(),
            log_level: "info".into(),
            log_json: false,
            cors_allowed_origins: None,
            enable_swagger: false,
        };
        Arc::new(AppState {
            store: plotdeck_dataset::DatasetStore::new(&config.data_dir),
            credentials: CredentialStore::new(&config.credentials_path),
            config: Arc::new(config),
        })
    }

    #[test]
    fn chart_generation_runs_cooler_than_chat() {
        assert_eq!(CHART_TEMPERATURE, 0.3);
        assert_eq!(CHAT_TEMPERATURE, 0.7);
        assert!(CHART_TEMPERATURE < CHAT_TEMPERATURE);
    }

    #[tokio::test]
    async fn chart_request_without_key_fails_fast() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state(dir.path());
        state.store.save_upload("s.csv", b"a\n1\n").expect("save");

        let err = llm_chat(
            State(state),
            Query(LlmChatQuery {
                prompt: "plot a".into(),
                dataset: "s".into(),
                model: None,
            }),
        )
        .await
        .expect_err("must fail");
        assert!(matches!(err, ServerError::Configuration(_)));
    }

    #[tokio::test]
    async fn chart_request_checks_dataset_before_upstream() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = llm_chat(
            State(state(dir.path())),
            Query(LlmChatQuery {
                prompt: "plot a".into(),
                dataset: "absent".into(),
                model: None,
            }),
        )
        .await
        .expect_err("must fail");
        assert!(matches!(
            err,
            ServerError::Dataset(plotdeck_dataset::DatasetError::NotFound(_))
        ));
    }

    #[test]
    fn grounded_chat_messages_carry_summary_and_marker() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state(dir.path());
        state
            .store
            .save_upload("sales.csv", b"amount\n10\n20\n")
            .expect("save");

        let messages = chat_messages(&state, "what is the trend?", Some("sales"), "en");
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("Dataset Summary:"));
        assert!(messages[1].content.starts_with("[Context: Analyzing dataset 'sales']"));
    }

    #[test]
    fn unreadable_dataset_degrades_to_a_note() {
        let dir = tempfile::tempdir().expect("tempdir");
        let messages = chat_messages(&state(dir.path()), "hi", Some("absent"), "en");
        assert!(messages[0].content.contains("Could not load dataset 'absent'"));
    }
}
