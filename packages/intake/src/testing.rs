//! Testing utilities including mock implementations.
//!
//! Deterministic doubles for the pipeline's capability traits, so intake
//! logic can be exercised without network calls. Each mock records its
//! calls for assertions (e.g. "the summarizer was never invoked").

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::{IntakeError, Result};
use crate::traits::{BlobStore, FieldSummarizer, TextExtractor};

/// Record of a call made to [`MockSummarizer`].
#[derive(Debug, Clone)]
pub struct SummarizeCall {
    pub text: String,
    pub prompt: String,
}

/// A mock summarizer returning deterministic, configurable responses.
///
/// By default it answers with a JSON object covering every semantic field
/// the pipeline knows about, so any slot's prompt finds its key:
/// `{"name": "summary:<text>", "description": ..., "address": ..., "date": ...}`.
#[derive(Default)]
pub struct MockSummarizer {
    /// (matcher, response) pairs; the first matcher contained in the
    /// prompt or text wins.
    responses: RwLock<Vec<(String, String)>>,
    calls: Arc<RwLock<Vec<SummarizeCall>>>,
    failing: AtomicBool,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond with `response` whenever `matcher` appears in the prompt or
    /// the text being summarized.
    pub fn with_response(self, matcher: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .push((matcher.into(), response.into()));
        self
    }

    /// Make every summarize call fail, as a dead upstream would.
    pub fn failing(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    /// All calls made to this mock.
    pub fn calls(&self) -> Vec<SummarizeCall> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl FieldSummarizer for MockSummarizer {
    async fn summarize(&self, text: &str, prompt: &str) -> Result<String> {
        self.calls.write().unwrap().push(SummarizeCall {
            text: text.to_string(),
            prompt: prompt.to_string(),
        });

        if self.failing.load(Ordering::SeqCst) {
            return Err(IntakeError::Summarize("mock summarizer failure".into()));
        }

        for (matcher, response) in self.responses.read().unwrap().iter() {
            if prompt.contains(matcher) || text.contains(matcher) {
                return Ok(response.clone());
            }
        }

        let summary = format!("summary:{text}");
        Ok(serde_json::json!({
            "name": summary,
            "description": summary,
            "address": summary,
            "date": summary,
        })
        .to_string())
    }
}

/// A mock extractor that "extracts" a marker string from any supported file.
#[derive(Default)]
pub struct MockExtractor {
    calls: Arc<RwLock<Vec<String>>>,
    failing: AtomicBool,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    /// File names passed to extract.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    async fn extract(&self, file_name: &str, _extension: &str, bytes: &[u8]) -> Result<String> {
        self.calls.write().unwrap().push(file_name.to_string());

        if self.failing.load(Ordering::SeqCst) {
            return Err(IntakeError::Extract {
                file_name: file_name.to_string(),
                reason: "mock extraction failure".into(),
            });
        }

        Ok(format!("text:{}:{}", file_name, bytes.len()))
    }

    fn supports(&self, extension: &str) -> bool {
        matches!(extension, "pdf" | "docx")
    }
}

/// A mock blob store returning stable URLs under a test host.
#[derive(Default)]
pub struct MockBlobStore {
    uploads: Arc<RwLock<Vec<String>>>,
    failing: AtomicBool,
}

impl MockBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    /// File names uploaded so far.
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.read().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.read().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn upload(&self, file_name: &str, _bytes: &[u8]) -> Result<String> {
        self.uploads.write().unwrap().push(file_name.to_string());

        if self.failing.load(Ordering::SeqCst) {
            return Err(IntakeError::Upload("mock upload failure".into()));
        }

        Ok(format!("https://blobs.test/kyc_documents/{file_name}"))
    }
}
