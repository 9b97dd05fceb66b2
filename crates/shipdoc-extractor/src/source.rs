//! Primary extraction sources
//!
//! The reconciler holds an ordered list of payload sources and tries them
//! in sequence until one yields a valid payload. This replaces branching on
//! which API client happens to be configured: backends are adapted into
//! sources and injected at construction time.

use crate::config::QueryMode;
use crate::error::ExtractorError;
use crate::parser;
use crate::prompt;
use crate::types::DocumentPayload;
use shipdoc_domain::traits::LlmBackend;
use shipdoc_domain::CanonicalField;
use tracing::{debug, warn};

/// The "attempt extraction" capability: given document text, either produce
/// a schema-valid payload or fail.
pub trait PayloadSource: Send + Sync {
    /// Source name, recorded as `llm_provider` when this source wins
    fn name(&self) -> &str;

    /// Attempt to extract a structured payload from the text
    fn attempt(&self, text: &str) -> Result<DocumentPayload, ExtractorError>;
}

/// Adapts any `LlmBackend` into a payload source.
pub struct LlmSource<B> {
    backend: B,
    mode: QueryMode,
    prompt_text_limit: usize,
}

impl<B> LlmSource<B>
where
    B: LlmBackend + Send + Sync,
{
    /// Wrap a backend with default settings (combined query mode)
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            mode: QueryMode::Combined,
            prompt_text_limit: 3_000,
        }
    }

    /// Select combined or per-field querying
    pub fn with_mode(mut self, mode: QueryMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set how many characters of document text each prompt carries
    pub fn with_prompt_limit(mut self, limit: usize) -> Self {
        self.prompt_text_limit = limit;
        self
    }

    fn attempt_combined(&self, text: &str) -> Result<DocumentPayload, ExtractorError> {
        let prompt = prompt::combined_prompt(text, self.prompt_text_limit);
        let response = self
            .backend
            .generate_structured(&prompt, prompt::PAYLOAD_SCHEMA)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("backend '{}' returned {} chars", self.backend.name(), response.len());
        parser::parse_payload(&response)
    }

    /// One sub-query per text field. Sub-queries are independent: a failed
    /// field is skipped, and the merge waits for all of them. The whole
    /// attempt fails only when every sub-query errors.
    fn attempt_per_field(&self, text: &str) -> Result<DocumentPayload, ExtractorError> {
        let mut payload = DocumentPayload::default();
        let mut succeeded = 0usize;

        let results: Vec<(CanonicalField, Result<String, String>)> = std::thread::scope(|scope| {
            let handles: Vec<_> = CanonicalField::TEXT_FIELDS
                .iter()
                .map(|&field| {
                    scope.spawn(move || {
                        let prompt = prompt::field_prompt(field, text, self.prompt_text_limit);
                        (
                            field,
                            self.backend
                                .generate(&prompt)
                                .map_err(|e| e.to_string()),
                        )
                    })
                })
                .collect();

            handles
                .into_iter()
                .filter_map(|handle| handle.join().ok())
                .collect()
        });

        for (field, result) in results {
            match result {
                Ok(response) => {
                    succeeded += 1;
                    if let Some(value) = parser::parse_field_response(field, &response) {
                        payload.fields.insert(field, value);
                    }
                }
                Err(e) => warn!("sub-query for '{}' failed: {}", field, e),
            }
        }

        if succeeded == 0 {
            return Err(ExtractorError::Llm(
                "all field sub-queries failed".to_string(),
            ));
        }
        Ok(payload)
    }
}

impl<B> PayloadSource for LlmSource<B>
where
    B: LlmBackend + Send + Sync,
{
    fn name(&self) -> &str {
        self.backend.name()
    }

    fn attempt(&self, text: &str) -> Result<DocumentPayload, ExtractorError> {
        match self.mode {
            QueryMode::Combined => self.attempt_combined(text),
            QueryMode::PerField => self.attempt_per_field(text),
        }
    }
}
