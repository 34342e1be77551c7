//! Seam between the offers domain and the external media host.
//!
//! The service talks to `MediaStore`; production wires in the Cloudinary
//! client, tests substitute an in-memory fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cloudinary::{CloudinaryAsset, CloudinaryService, UploadOptions};

/// Image formats the marketplace accepts.
pub const ALLOWED_IMAGE_FORMATS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Descriptor of a stored asset, persisted on the offer document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    pub public_id: String,
    pub secure_url: String,
    pub format: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl From<CloudinaryAsset> for MediaAsset {
    fn from(asset: CloudinaryAsset) -> Self {
        Self {
            public_id: asset.public_id,
            secure_url: asset.secure_url,
            format: asset.format,
            bytes: asset.bytes,
            width: asset.width,
            height: asset.height,
        }
    }
}

/// An uploaded image as it arrived in the multipart request.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Lower-cased filename extension, if any.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.filename.rsplit_once('.')?;
        Some(ext.to_ascii_lowercase())
    }

    /// Whether the file claims one of the accepted image formats.
    pub fn has_allowed_format(&self) -> bool {
        self.extension()
            .is_some_and(|ext| ALLOWED_IMAGE_FORMATS.contains(&ext.as_str()))
    }
}

/// Where an upload should land in the media host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaDestination {
    /// A folder; the host assigns the asset id within it.
    Folder(String),
    /// An exact asset id; uploading to it overwrites the previous asset.
    PublicId(String),
}

/// External object-storage collaborator.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(
        &self,
        image: ImageFile,
        destination: MediaDestination,
    ) -> anyhow::Result<MediaAsset>;

    async fn delete_by_prefix(&self, prefix: &str) -> anyhow::Result<()>;

    async fn delete_folder(&self, path: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl MediaStore for CloudinaryService {
    async fn upload(
        &self,
        image: ImageFile,
        destination: MediaDestination,
    ) -> anyhow::Result<MediaAsset> {
        let options = match destination {
            MediaDestination::Folder(folder) => UploadOptions {
                folder: Some(folder),
                public_id: None,
                allowed_formats: ALLOWED_IMAGE_FORMATS.map(String::from).to_vec(),
            },
            MediaDestination::PublicId(public_id) => UploadOptions {
                folder: None,
                public_id: Some(public_id),
                allowed_formats: ALLOWED_IMAGE_FORMATS.map(String::from).to_vec(),
            },
        };

        let asset = CloudinaryService::upload(self, image.bytes, &image.filename, options).await?;
        Ok(asset.into())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> anyhow::Result<()> {
        self.delete_resources_by_prefix(prefix).await?;
        Ok(())
    }

    async fn delete_folder(&self, path: &str) -> anyhow::Result<()> {
        CloudinaryService::delete_folder(self, path).await?;
        Ok(())
    }
}
