//! In-memory double for the media host, recording every call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use server_core::domains::offers::{ImageFile, MediaAsset, MediaDestination, MediaStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaCall {
    Upload(MediaDestination),
    DeleteByPrefix(String),
    DeleteFolder(String),
}

#[derive(Default)]
pub struct FakeMediaStore {
    calls: Mutex<Vec<MediaCall>>,
    fail_uploads: AtomicBool,
}

impl FakeMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All media calls seen so far, in order.
    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Make subsequent uploads fail, to simulate a media-host outage.
    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    fn record(&self, call: MediaCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(
        &self,
        image: ImageFile,
        destination: MediaDestination,
    ) -> anyhow::Result<MediaAsset> {
        self.record(MediaCall::Upload(destination.clone()));
        if self.fail_uploads.load(Ordering::SeqCst) {
            anyhow::bail!("media host unavailable");
        }

        let public_id = match destination {
            MediaDestination::Folder(folder) => format!("{folder}/fake-asset"),
            MediaDestination::PublicId(public_id) => public_id,
        };
        Ok(MediaAsset {
            secure_url: format!("https://media.test/{public_id}.jpg"),
            public_id,
            format: "jpg".to_string(),
            bytes: image.bytes.len() as u64,
            width: 640,
            height: 480,
        })
    }

    async fn delete_by_prefix(&self, prefix: &str) -> anyhow::Result<()> {
        self.record(MediaCall::DeleteByPrefix(prefix.to_string()));
        Ok(())
    }

    async fn delete_folder(&self, path: &str) -> anyhow::Result<()> {
        self.record(MediaCall::DeleteFolder(path.to_string()));
        Ok(())
    }
}
