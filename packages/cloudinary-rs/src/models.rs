use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Asset descriptor returned by the upload endpoint.
///
/// Cloudinary returns more fields than these; only the ones the caller
/// actually stores are modeled, the rest are ignored on deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudinaryAsset {
    pub public_id: String,
    pub secure_url: String,
    pub format: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub resource_type: String,
}

/// Response of the admin `resources` deletion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResourcesResponse {
    /// Map of public_id -> deletion outcome ("deleted", "not_found", ...).
    #[serde(default)]
    pub deleted: HashMap<String, String>,
}

/// Error body Cloudinary returns on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorMessage {
    pub message: String,
}
