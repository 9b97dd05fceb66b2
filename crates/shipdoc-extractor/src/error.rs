//! Error types for extraction

use thiserror::Error;

/// Errors that can occur during extraction.
///
/// Only invalid input escapes `Reconciler::reconcile`; strategy and parse
/// failures are recovered internally by falling through to the next
/// strategy or yielding a null field.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Document text is empty after trimming
    #[error("Empty document: no text to extract from")]
    EmptyDocument,

    /// Text exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// LLM backend error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Payload does not conform to the extraction schema
    #[error("Invalid payload format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
