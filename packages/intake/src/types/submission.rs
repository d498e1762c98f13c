//! Parsed multipart submissions, before and after staging.

use crate::error::{IntakeError, Result};
use crate::types::id::FileId;
use crate::types::slot::{ConstitutionOption, DocumentSlot};

/// Largest accepted upload per file.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Extensions a client may submit. Only `.pdf` and `.docx` yield text; the
/// rest are stored without extraction.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["pdf", "doc", "docx", "jpg", "jpeg", "png"];

/// One uploaded document, bound to the slot it was submitted under.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub slot: DocumentSlot,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Lowercased file extension, without the dot.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

/// A company-details submission: an optional constitution choice plus
/// zero-or-more documents, at most one per slot.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub option: Option<ConstitutionOption>,
    pub documents: Vec<UploadedDocument>,
}

impl Submission {
    /// The document submitted for a slot, if any.
    pub fn document(&self, slot: DocumentSlot) -> Option<&UploadedDocument> {
        self.documents.iter().find(|d| d.slot == slot)
    }

    /// Reject oversized files, disallowed extensions, and duplicate slots
    /// before any upload happens.
    pub fn validate(&self) -> Result<()> {
        let mut seen: Vec<DocumentSlot> = Vec::new();
        for document in &self.documents {
            if seen.contains(&document.slot) {
                return Err(IntakeError::validation(format!(
                    "duplicate file for {}",
                    document.slot
                )));
            }
            seen.push(document.slot);

            if document.bytes.len() > MAX_FILE_BYTES {
                return Err(IntakeError::validation(format!(
                    "{} exceeds the 10MB limit",
                    document.file_name
                )));
            }

            match document.extension() {
                Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
                _ => {
                    return Err(IntakeError::validation(format!(
                        "unsupported file type for {}",
                        document.file_name
                    )))
                }
            }
        }
        Ok(())
    }
}

/// A document after upload: blob stored, file record created, text extracted
/// when the format supports it.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub slot: DocumentSlot,
    pub file_id: FileId,
    pub file_url: String,
    pub text: Option<String>,
}
