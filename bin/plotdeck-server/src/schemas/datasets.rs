//! Request / response bodies for the dataset routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DatasetListResponse {
    /// Request-facing (hyphenated) dataset names.
    pub datasets: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FileListResponse {
    /// Raw `.csv` filenames in the data directory.
    pub files: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DatasetRecordsResponse {
    /// Row-major records; NaN and infinity are rendered as `null`.
    pub data: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub filename: String,
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteRequest {
    /// Exact storage filename, e.g. `my_data.csv`.
    pub filename: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
