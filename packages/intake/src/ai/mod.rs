//! LLM provider implementations of [`FieldSummarizer`](crate::traits::FieldSummarizer).

mod gemini;

pub use gemini::GeminiSummarizer;
