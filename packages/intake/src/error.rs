//! Typed errors for the intake library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur during document intake operations.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Text extraction from an uploaded document failed
    #[error("extraction failed for {file_name}: {reason}")]
    Extract { file_name: String, reason: String },

    /// Summarization service unavailable or failed
    #[error("summarizer error: {0}")]
    Summarize(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Blob upload failed
    #[error("blob upload error: {0}")]
    Upload(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Submission failed validation before any processing
    #[error("invalid submission: {reason}")]
    Validation { reason: String },

    /// No company record exists for the requested user or id
    #[error("company record not found")]
    RecordNotFound,

    /// A slot references a file record that does not exist
    #[error("file record not found: {id}")]
    FileNotFound { id: String },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntakeError {
    /// Build a validation error from any displayable reason.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// True for errors the HTTP layer should map to a 400-class response.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Result type alias for intake operations.
pub type Result<T> = std::result::Result<T, IntakeError>;
