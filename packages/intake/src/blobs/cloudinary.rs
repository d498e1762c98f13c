//! Cloudinary implementation of the blob store.
//!
//! Uses the unsigned upload endpoint with an upload preset, so no request
//! signing is needed. The returned `secure_url` is what gets persisted on
//! the file record.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{IntakeError, Result};
use crate::traits::BlobStore;

const DEFAULT_FOLDER: &str = "kyc_documents";

/// Cloudinary-backed blob store.
#[derive(Clone)]
pub struct CloudinaryBlobStore {
    client: Client,
    cloud_name: String,
    upload_preset: String,
    folder: String,
    base_url: String,
}

impl CloudinaryBlobStore {
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
            folder: DEFAULT_FOLDER.to_string(),
            base_url: "https://api.cloudinary.com/v1_1".to_string(),
        }
    }

    /// Create from `CLOUDINARY_CLOUD_NAME` and `CLOUDINARY_UPLOAD_PRESET`.
    pub fn from_env() -> Result<Self> {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME")
            .map_err(|_| IntakeError::Config("CLOUDINARY_CLOUD_NAME not set".into()))?;
        let upload_preset = std::env::var("CLOUDINARY_UPLOAD_PRESET")
            .map_err(|_| IntakeError::Config("CLOUDINARY_UPLOAD_PRESET not set".into()))?;
        Ok(Self::new(cloud_name, upload_preset))
    }

    /// Override the destination folder (default: kyc_documents).
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Set a custom base URL (for tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[async_trait]
impl BlobStore for CloudinaryBlobStore {
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<String> {
        // resource_type "auto" lets Cloudinary accept both images and raw
        // documents on the same endpoint.
        let url = format!("{}/{}/auto/upload", self.base_url, self.cloud_name);

        let part = Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", self.folder.clone());

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| IntakeError::Upload(e.to_string().into()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IntakeError::Upload(
                format!("Cloudinary returned {status}: {body}").into(),
            ));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| IntakeError::Upload(e.to_string().into()))?;

        tracing::info!(file_name, url = %parsed.secure_url, "uploaded blob");
        Ok(parsed.secure_url)
    }
}
