//! Dataset CRUD routes.
//!
//! Uploads arrive as multipart form data with a single `file` field; the
//! `.csv` extension gate runs before anything touches disk. Reads
//! materialize the table from disk on every request; there is no cache.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::datasets::{
    DatasetListResponse, DatasetRecordsResponse, DeleteRequest, FileListResponse,
    MessageResponse, UploadResponse,
};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_datasets, list_files, list_csv, get_dataset, upload_csv, delete_file),
    components(schemas(
        DatasetListResponse,
        FileListResponse,
        DatasetRecordsResponse,
        UploadResponse,
        DeleteRequest,
        MessageResponse
    ))
)]
pub struct DatasetsApi;

/// Register dataset routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/available-datasets", get(list_datasets))
        .route("/files", get(list_files))
        .route("/list-csv", get(list_csv))
        .route("/upload-csv", post(upload_csv))
        .route("/delete", delete(delete_file))
        .route("/{dataset_name}", get(get_dataset))
}

/// Request-facing names of every stored dataset (`GET /available-datasets`).
#[utoipa::path(
    get,
    path = "/available-datasets",
    tag = "datasets",
    responses(
        (status = 200, description = "Dataset names", body = DatasetListResponse)
    )
)]
pub async fn list_datasets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatasetListResponse>, ServerError> {
    let datasets = state.store.list_datasets()?;
    Ok(Json(DatasetListResponse { datasets }))
}

/// Raw filenames in the data directory (`GET /files`).
#[utoipa::path(
    get,
    path = "/files",
    tag = "datasets",
    responses(
        (status = 200, description = "Stored CSV filenames", body = FileListResponse)
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FileListResponse>, ServerError> {
    let files = state.store.list_files()?;
    Ok(Json(FileListResponse { files }))
}

/// Alias of `/files` kept for existing clients (`GET /list-csv`).
#[utoipa::path(
    get,
    path = "/list-csv",
    tag = "datasets",
    responses(
        (status = 200, description = "Stored CSV filenames", body = FileListResponse)
    )
)]
pub async fn list_csv(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FileListResponse>, ServerError> {
    list_files(State(state)).await
}

/// All rows of a dataset as JSON records (`GET /{dataset_name}`).
///
/// NaN and infinity have no JSON representation and arrive as `null`.
#[utoipa::path(
    get,
    path = "/{dataset_name}",
    tag = "datasets",
    params(("dataset_name" = String, Path, description = "Request-facing dataset name")),
    responses(
        (status = 200, description = "Row-major records", body = DatasetRecordsResponse),
        (status = 404, description = "Dataset not found"),
    )
)]
pub async fn get_dataset(
    State(state): State<Arc<AppState>>,
    Path(dataset_name): Path<String>,
) -> Result<Json<DatasetRecordsResponse>, ServerError> {
    let table = state.store.load(&dataset_name)?;
    debug!(dataset = %dataset_name, rows = table.n_rows, "serving dataset records");
    // NaN and Inf must never reach the wire.
    let data = table
        .records()
        .into_iter()
        .map(|r| plotdeck_dataset::sanitize_value(serde_json::Value::Object(r)))
        .collect();
    Ok(Json(DatasetRecordsResponse { data }))
}

/// Store an uploaded CSV (`POST /upload-csv`).
///
/// Multipart form data with a single `file` field. A non-`.csv` filename
/// is rejected before any disk write; a same-named file is overwritten.
#[utoipa::path(
    post,
    path = "/upload-csv",
    tag = "datasets",
    request_body(content = Vec<u8>, description = "CSV file upload (multipart/form-data)"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file field or non-CSV filename"),
    )
)]
pub async fn upload_csv(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("failed to read multipart field: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| ServerError::BadRequest("upload has no filename".into()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::BadRequest(format!("failed to read upload: {e}")))?;

        state.store.save_upload(&filename, &bytes)?;
        info!(file = %filename, size = bytes.len(), "dataset uploaded");

        return Ok(Json(UploadResponse {
            message: format!("File {filename} uploaded successfully"),
            filename,
        }));
    }

    Err(ServerError::BadRequest("no file field in upload".into()))
}

/// Delete a stored file by exact name (`DELETE /delete`).
#[utoipa::path(
    delete,
    path = "/delete",
    tag = "datasets",
    request_body = DeleteRequest,
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 404, description = "File not found"),
        (status = 403, description = "Permission denied"),
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<MessageResponse>, ServerError> {
    state.store.delete(&req.filename)?;
    info!(file = %req.filename, "dataset deleted");
    Ok(Json(MessageResponse {
        message: format!("File {} deleted successfully", req.filename),
    }))
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
    async fn dataset_records_are_served_with_null_sanitization() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state(dir.path());
        state
            .store
            .save_upload("metrics.csv", b"v\nNaN\n2.5\n")
            .expect("save");

        let Json(body) = get_dataset(State(state), Path("metrics".into()))
            .await
            .expect("handler");
        assert_eq!(body.data.len(), 2);
        assert_eq!(body.data[0]["v"], serde_json::Value::Null);
        assert_eq!(body.data[1]["v"], serde_json::json!(2.5));
    }

    #[tokio::test]
    async fn missing_dataset_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = get_dataset(State(state(dir.path())), Path("absent".into()))
            .await
            .expect_err("must fail");
        assert!(matches!(
            err,
            ServerError::Dataset(plotdeck_dataset::DatasetError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_route_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = delete_file(
            State(state(dir.path())),
            Json(DeleteRequest { filename: "gone.csv".into() }),
        )
        .await
        .expect_err("must fail");
        assert!(matches!(
            err,
            ServerError::Dataset(plotdeck_dataset::DatasetError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn listings_hyphenate_dataset_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state(dir.path());
        state
            .store
            .save_upload("sales_2024.csv", b"a\n1\n")
            .expect("save");

        let Json(datasets) = list_datasets(State(state.clone())).await.expect("handler");
        assert_eq!(datasets.datasets, vec!["sales-2024"]);

        let Json(files) = list_files(State(state)).await.expect("handler");
        assert_eq!(files.files, vec!["sales_2024.csv"]);
    }
}
