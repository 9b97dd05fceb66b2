//! Shipdoc LLM Backend Layer
//!
//! Pluggable implementations of the `LlmBackend` trait from
//! `shipdoc-domain`. The reconciler takes backends by constructor injection,
//! so extraction logic is testable without network access and multiple
//! backend configurations can coexist.
//!
//! # Backends
//!
//! - `MockBackend`: deterministic mock for testing
//! - `AnthropicBackend`: hosted Anthropic Messages API
//!
//! # Examples
//!
//! ```
//! use shipdoc_llm::MockBackend;
//! use shipdoc_domain::traits::LlmBackend;
//!
//! let backend = MockBackend::new("Hello from LLM!");
//! let result = backend.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod anthropic;

use shipdoc_domain::traits::LlmBackend;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use anthropic::AnthropicBackend;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the backend
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Mock LLM backend for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use shipdoc_llm::MockBackend;
/// use shipdoc_domain::traits::LlmBackend;
///
/// // Simple fixed response
/// let backend = MockBackend::new("Fixed response");
/// assert_eq!(backend.generate("any prompt").unwrap(), "Fixed response");
///
/// // Prompt-specific responses
/// let mut backend = MockBackend::default();
/// backend.add_response("prompt1", "response1");
/// assert_eq!(backend.generate("prompt1").unwrap(), "response1");
/// ```
#[derive(Debug, Clone)]
pub struct MockBackend {
    name: String,
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockBackend {
    /// Create a MockBackend with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            name: "mock".to_string(),
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Override the backend name reported to callers
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Configure every call to fail
    pub fn failing() -> Self {
        Self::new("ERROR")
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmBackend for MockBackend {
    type Error = LlmError;

    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        let responses = self.responses.lock().unwrap();
        let response = responses
            .get(prompt)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone());

        if response == "ERROR" {
            return Err(LlmError::Other("Mock error".to_string()));
        }
        Ok(response)
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        self.generate(prompt)
    }
}
