//! Text extractors for the supported document formats.

mod docx;
mod pdf;

pub use docx::extract_docx_text;
pub use pdf::extract_pdf_text;

use async_trait::async_trait;

use crate::error::{IntakeError, Result};
use crate::traits::TextExtractor;

/// Extension-dispatching extractor covering PDF and DOCX.
///
/// Parsing is CPU-bound and runs on the blocking pool so a large document
/// does not stall the request executor.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for DocumentExtractor {
    async fn extract(&self, file_name: &str, extension: &str, bytes: &[u8]) -> Result<String> {
        let task_file_name = file_name.to_string();
        let extension = extension.to_string();
        let bytes = bytes.to_vec();

        let handle = tokio::task::spawn_blocking(move || match extension.as_str() {
            "pdf" => extract_pdf_text(&task_file_name, &bytes),
            "docx" => extract_docx_text(&task_file_name, &bytes),
            other => Err(IntakeError::Extract {
                file_name: task_file_name,
                reason: format!("no extractor for .{other}"),
            }),
        });

        handle.await.map_err(|e| IntakeError::Extract {
            file_name: file_name.to_string(),
            reason: format!("extraction task panicked: {e}"),
        })?
    }

    fn supports(&self, extension: &str) -> bool {
        matches!(extension, "pdf" | "docx")
    }
}
