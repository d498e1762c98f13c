//! Field summarization trait, the LLM-backed capability.

use async_trait::async_trait;

use crate::error::Result;

/// Turns extracted document text into a structured field value.
///
/// Implementations wrap a specific text-generation provider and handle the
/// transport; they return the model's response string verbatim. The caller
/// owns defensive parsing: the response is asked to be a minimal JSON object
/// holding exactly the target field, but malformed output must degrade to
/// the raw string rather than fail the request.
#[async_trait]
pub trait FieldSummarizer: Send + Sync {
    /// Send `text` with a slot-specific instruction and return the raw
    /// response.
    ///
    /// Transport failures, a missing API key, and empty responses are all
    /// fatal for the request that triggered the call. No retries.
    async fn summarize(&self, text: &str, prompt: &str) -> Result<String>;
}
