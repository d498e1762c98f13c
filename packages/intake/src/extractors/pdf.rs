//! PDF text extraction via the `pdf-extract` crate.

use crate::error::{IntakeError, Result};

/// Extract the full text of a PDF document.
///
/// Encrypted, scanned, and corrupt PDFs surface as [`IntakeError::Extract`];
/// the pipeline treats that as fatal for the request.
pub fn extract_pdf_text(file_name: &str, bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| IntakeError::Extract {
        file_name: file_name.to_string(),
        reason: e.to_string(),
    })
}
