//! Text extraction trait for uploaded documents.

use async_trait::async_trait;

use crate::error::Result;

/// Extracts plain text from an uploaded document.
///
/// Implementations dispatch on the file extension. An unsupported extension
/// is not an error (the pipeline checks [`supports`](TextExtractor::supports)
/// first and skips text for that slot), but a failure on a supported format
/// (corrupt file, parser error) is fatal for the whole request.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the full plain-text contents of `bytes`.
    ///
    /// `extension` is the lowercased file extension without the dot.
    async fn extract(&self, file_name: &str, extension: &str, bytes: &[u8]) -> Result<String>;

    /// Whether this extractor can produce text for the given extension.
    fn supports(&self, extension: &str) -> bool;
}
