//! Trait definitions for external interactions
//!
//! These traits define the boundary between the extraction logic and
//! infrastructure. Implementations live in other crates (shipdoc-llm).

/// Trait for LLM backend operations
///
/// The reconciler treats a backend as an opaque function from document text
/// to a structured payload; backends are constructor-injected so extraction
/// is testable without network access.
pub trait LlmBackend {
    /// Error type for backend operations
    type Error: std::fmt::Display;

    /// Backend name, recorded as the extraction record's `llm_provider`
    fn name(&self) -> &str;

    /// Generate a text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate output expected to conform to the given JSON schema
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}
