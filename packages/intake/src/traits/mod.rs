//! Core trait abstractions.
//!
//! External AI and storage collaborators are modeled as capability traits
//! injected into the pipeline, so tests run against deterministic doubles
//! instead of live network calls.

pub mod blob;
pub mod extractor;
pub mod store;
pub mod summarizer;

pub use blob::BlobStore;
pub use extractor::TextExtractor;
pub use store::RecordStore;
pub use summarizer::FieldSummarizer;
