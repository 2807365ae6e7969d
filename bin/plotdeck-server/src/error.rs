//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! Domain errors keep their messages: callers relied on seeing the exact
//! evaluation / fallback failure text. Only unclassified internals are
//! replaced by a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use plotdeck_chart::ChartError;
use plotdeck_dataset::DatasetError;
use plotdeck_llm::LlmError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// All errors that can occur in the plotdeck-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the dataset store.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// Propagated from the chat-completions upstream.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Propagated from the chart synthesis pipeline.
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The caller referenced a resource that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server is missing required configuration (e.g. no API key).
    #[error("server configuration error: {0}")]
    Configuration(String),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            ServerError::Dataset(e) => match e {
                DatasetError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                DatasetError::PermissionDenied(_) => (StatusCode::FORBIDDEN, e.to_string()),
                DatasetError::InvalidExtension(_)
                | DatasetError::InvalidFilename(_)
                | DatasetError::Csv(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                DatasetError::Io(io) => {
                    error!(error = %io, "dataset I/O error");
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
                }
            },

            ServerError::Llm(e) => match e {
                LlmError::Unauthorized => (StatusCode::UNAUTHORIZED, e.to_string()),
                LlmError::Upstream { .. }
                | LlmError::Transport(_)
                | LlmError::MalformedResponse(_) => {
                    error!(error = %e, "upstream completion error");
                    (StatusCode::BAD_GATEWAY, e.to_string())
                }
            },

            ServerError::Chart(e) => {
                error!(error = %e, "chart synthesis error");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }

            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::Configuration(m) => {
                error!(message = %m, "configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, m.clone())
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_owned())
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(e: anyhow::Error) -> Self {
        // Log the full error chain before discarding it so the detail is
        // preserved in the server logs even though clients only see a
        // generic message.
        error!(error = ?e, "converting anyhow error to ServerError::Internal");
        ServerError::Internal(e.to_string())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dataset_not_found_maps_to_404() {
        let err = ServerError::Dataset(DatasetError::NotFound("x.csv".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn permission_denied_maps_to_403() {
        let err = ServerError::Dataset(DatasetError::PermissionDenied("x.csv".into()));
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn unauthorized_upstream_maps_to_401() {
        let err = ServerError::Llm(LlmError::Unauthorized);
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn upstream_failure_maps_to_502() {
        let err = ServerError::Llm(LlmError::Upstream { status: 500, detail: "boom".into() });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn chart_failure_maps_to_500() {
        let err = ServerError::Chart(ChartError::ExecutionFailed {
            primary: "a".into(),
            fallback: "b".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
