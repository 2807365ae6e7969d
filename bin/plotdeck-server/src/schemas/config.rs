//! Request / response bodies for the credential routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiKeyResponse {
    /// `null` when no key is stored.
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApiKeyRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}
