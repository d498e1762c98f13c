//! Document Intake and Field Extraction Library
//!
//! Turns multipart KYC submissions into persisted company records: each
//! uploaded document is pushed to blob storage, its text extracted, and an
//! LLM asked to produce the slot's structured field value; the results are
//! merged with the user's existing record and committed in one write.
//!
//! # Design
//!
//! - A fixed table of slot descriptors drives all per-slot processing,
//!   with no per-field branches.
//! - External collaborators (text extraction, summarization, blob storage,
//!   persistence) are capability traits injected into the pipeline, so
//!   tests run against deterministic doubles.
//! - Preservation is decided per slot by an explicit merge policy keyed on
//!   file identity, never content hashing.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use intake::{
//!     CloudinaryBlobStore, DocumentExtractor, GeminiSummarizer, IntakePipeline,
//!     PostgresRecordStore,
//! };
//!
//! let pipeline = IntakePipeline::new(
//!     Arc::new(DocumentExtractor::new()),
//!     Arc::new(GeminiSummarizer::from_env()?),
//!     Arc::new(CloudinaryBlobStore::from_env()?),
//!     Arc::new(PostgresRecordStore::new(&database_url).await?),
//! );
//!
//! let outcome = pipeline.submit(user_id, submission).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Capability trait abstractions
//! - [`types`] - Records, slots, and submissions
//! - [`pipeline`] - The intake pipeline and merge policy
//! - [`extractors`] - PDF and DOCX text extraction
//! - [`ai`] - Summarizer implementations (Gemini)
//! - [`blobs`] - Blob store implementations (Cloudinary)
//! - [`stores`] - Record store implementations
//! - [`testing`] - Mock implementations for tests

pub mod ai;
pub mod blobs;
pub mod error;
pub mod extractors;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{IntakeError, Result};
pub use traits::{BlobStore, FieldSummarizer, RecordStore, TextExtractor};
pub use types::{
    CompanyRecord, ConstitutionOption, ConstitutionValue, DocumentSlot, FileId, FileRecord,
    NewFileRecord, RecordId, SlotValue, StagedFile, Submission, UploadedDocument, UserId,
    ALLOWED_EXTENSIONS, MAX_FILE_BYTES, SUMMARIZED_SLOTS,
};

// Re-export pipeline components
pub use pipeline::{IntakePipeline, SlotAction, SubmissionOutcome};

// Re-export implementations
pub use ai::GeminiSummarizer;
pub use blobs::CloudinaryBlobStore;
pub use extractors::DocumentExtractor;
pub use stores::MemoryRecordStore;

#[cfg(feature = "postgres")]
pub use stores::PostgresRecordStore;

// Re-export testing utilities
pub use testing::{MockBlobStore, MockExtractor, MockSummarizer};
