//! Chart artifact serving.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::debug;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_plot))]
pub struct PlotsApi;

/// Register artifact routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/plot/{filename}", get(get_plot))
}

/// Serve a rendered chart PNG (`GET /plot/{filename}`).
///
/// The filename must be a single path component; anything that could
/// escape the artifacts directory is rejected.
#[utoipa::path(
    get,
    path = "/plot/{filename}",
    tag = "plots",
    params(("filename" = String, Path, description = "Artifact filename")),
    responses(
        (status = 200, description = "PNG bytes", content_type = "image/png"),
        (status = 400, description = "Invalid filename"),
        (status = 404, description = "No such artifact"),
    )
)]
pub async fn get_plot(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, ServerError> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(ServerError::BadRequest(format!("invalid artifact name: {filename}")));
    }

    let path = state.artifacts_dir().join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ServerError::NotFound(format!("no such plot: {filename}")));
        }
        Err(e) => return Err(ServerError::Internal(e.to_string())),
    };

    debug!(file = %filename, size = bytes.len(), "serving artifact");
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
