// Minimal Cloudinary client covering the three operations the marketplace
// server needs: signed image upload, delete-by-prefix, delete-folder.
// https://cloudinary.com/documentation/image_upload_api_reference

pub mod models;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::ApiErrorBody;
pub use crate::models::{CloudinaryAsset, DeleteResourcesResponse};

#[derive(Debug, Error)]
pub enum CloudinaryError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cloudinary returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

#[derive(Debug, Clone)]
pub struct CloudinaryOptions {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Where an uploaded asset should land.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    /// Target folder; Cloudinary assigns a random public id inside it.
    pub folder: Option<String>,
    /// Exact public id; an upload to an existing id overwrites the asset.
    pub public_id: Option<String>,
    /// File formats the API should accept (e.g. `["png", "jpg"]`).
    pub allowed_formats: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CloudinaryService {
    options: CloudinaryOptions,
    client: Client,
}

impl CloudinaryService {
    pub fn new(options: CloudinaryOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// Upload an image via the signed upload endpoint.
    pub async fn upload(
        &self,
        file: Vec<u8>,
        filename: &str,
        upload: UploadOptions,
    ) -> Result<CloudinaryAsset, CloudinaryError> {
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.options.cloud_name
        );

        let timestamp = chrono::Utc::now().timestamp().to_string();

        // Params that participate in the signature, sorted by key as the
        // signing scheme requires.
        let mut params: Vec<(&str, String)> = Vec::new();
        if !upload.allowed_formats.is_empty() {
            params.push(("allowed_formats", upload.allowed_formats.join(",")));
        }
        if let Some(folder) = &upload.folder {
            params.push(("folder", folder.clone()));
        }
        if let Some(public_id) = &upload.public_id {
            params.push(("public_id", public_id.clone()));
        }
        params.push(("timestamp", timestamp));
        params.sort_by(|a, b| a.0.cmp(b.0));

        let signature = sign_params(&params, &self.options.api_secret);

        let mut form =
            Form::new().part("file", Part::bytes(file).file_name(filename.to_string()));
        for (key, value) in &params {
            form = form.text(key.to_string(), value.clone());
        }
        form = form
            .text("api_key", self.options.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self.client.post(url).multipart(form).send().await?;
        parse_response(response).await
    }

    /// Delete every asset whose public id starts with `prefix`.
    pub async fn delete_resources_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<DeleteResourcesResponse, CloudinaryError> {
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/resources/image/upload",
            self.options.cloud_name
        );

        let response = self
            .client
            .delete(url)
            .basic_auth(&self.options.api_key, Some(&self.options.api_secret))
            .query(&[("prefix", prefix)])
            .send()
            .await?;
        parse_response(response).await
    }

    /// Delete an (empty) folder.
    pub async fn delete_folder(&self, path: &str) -> Result<(), CloudinaryError> {
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/folders/{}",
            self.options.cloud_name, path
        );

        let response = self
            .client
            .delete(url)
            .basic_auth(&self.options.api_key, Some(&self.options.api_secret))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(api_error(status, response).await)
        }
    }
}

/// SHA-256 request signature: `key=value` pairs sorted by key, joined with
/// `&`, with the API secret appended.
fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, CloudinaryError> {
    let status = response.status();
    if status.is_success() {
        Ok(response.json::<T>().await?)
    } else {
        Err(api_error(status, response).await)
    }
}

async fn api_error(status: StatusCode, response: reqwest::Response) -> CloudinaryError {
    let message = match response.json::<ApiErrorBody>().await {
        Ok(body) => body.error.message,
        Err(_) => "unreadable error body".to_string(),
    };
    CloudinaryError::Api { status, message }
}
