//! Credential management routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::config::{ApiKeyRequest, ApiKeyResponse, StatusResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(get_api_key, set_api_key, delete_api_key),
    components(schemas(ApiKeyResponse, ApiKeyRequest, StatusResponse))
)]
pub struct ConfigApi;

/// Register credential routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/config/openai-key",
        get(get_api_key).post(set_api_key).delete(delete_api_key),
    )
}

/// Read the stored API key (`GET /config/openai-key`).
#[utoipa::path(
    get,
    path = "/config/openai-key",
    tag = "config",
    responses(
        (status = 200, description = "Stored key, null when absent", body = ApiKeyResponse)
    )
)]
pub async fn get_api_key(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiKeyResponse>, ServerError> {
    let api_key = state.credentials.api_key()?;
    Ok(Json(ApiKeyResponse { api_key }))
}

/// Store (or replace) the API key (`POST /config/openai-key`).
#[utoipa::path(
    post,
    path = "/config/openai-key",
    tag = "config",
    request_body = ApiKeyRequest,
    responses(
        (status = 200, description = "Key stored", body = StatusResponse)
    )
)]
pub async fn set_api_key(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ApiKeyRequest>,
) -> Result<Json<StatusResponse>, ServerError> {
    state.credentials.store_api_key(&req.api_key)?;
    info!("API key updated via config endpoint");
    Ok(Json(StatusResponse { status: "ok".into() }))
}

/// Remove the stored API key (`DELETE /config/openai-key`).
#[utoipa::path(
    delete,
    path = "/config/openai-key",
    tag = "config",
    responses(
        (status = 200, description = "Key removed", body = StatusResponse)
    )
)]
pub async fn delete_api_key(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ServerError> {
    state.credentials.delete_api_key()?;
    info!("API key removed via config endpoint");
    Ok(Json(StatusResponse { status: "ok".into() }))
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

    #[tokio::test]
    async fn key_lifecycle_via_handlers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state(dir.path());

        let Json(initial) = get_api_key(State(state.clone())).await.expect("get");
        assert_eq!(initial.api_key, None);

        set_api_key(
            State(state.clone()),
            Json(ApiKeyRequest { api_key: "sk-abc".into() }),
        )
        .await
        .expect("set");

        let Json(stored) = get_api_key(State(state.clone())).await.expect("get");
        assert_eq!(stored.api_key, Some("sk-abc".into()));

        delete_api_key(State(state.clone())).await.expect("delete");
        let Json(after) = get_api_key(State(state)).await.expect("get");
        assert_eq!(after.api_key, None);
    }
}
