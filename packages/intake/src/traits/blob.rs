//! Blob storage trait for uploaded documents.

use async_trait::async_trait;

use crate::error::Result;

/// Uploads a document to remote object storage.
///
/// Blobs are write-once: the pipeline never deletes or overwrites them, so a
/// failed request can leave orphaned uploads behind (accepted; see the
/// design notes).
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload `bytes` and return a public URL for the stored object.
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> Result<String>;
}
