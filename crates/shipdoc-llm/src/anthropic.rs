//! Anthropic Messages API backend
//!
//! # Features
//!
//! - Async HTTP communication with the Messages API
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use shipdoc_llm::AnthropicBackend;
//!
//! let backend = AnthropicBackend::new("sk-ant-...", "claude-3-haiku-20240307");
//! // The async generate method needs an async context; the LlmBackend
//! // trait impl provides a blocking wrapper.
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use shipdoc_domain::traits::LlmBackend;
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// Default model
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Maximum tokens requested per completion
const MAX_TOKENS: u32 = 1024;

const ANTHROPIC_VERSION: &str = "2023-06-01";

const SYSTEM_PROMPT: &str = "You are a document processing assistant that \
extracts key information from business shipping documents.";

/// Anthropic Messages API backend.
pub struct AnthropicBackend {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    system: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

impl AnthropicBackend {
    /// Create a new backend
    ///
    /// # Parameters
    ///
    /// - `api_key`: Anthropic API key
    /// - `model`: model to use (e.g., "claude-3-haiku-20240307")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create a backend with the default model
    pub fn default_model(api_key: impl Into<String>) -> Self {
        Self::new(api_key, DEFAULT_MODEL)
    }

    /// Override the API endpoint (for proxies and test servers)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Generate text using the Messages API
    ///
    /// # Errors
    ///
    /// Returns an error if the API is unreachable, the model is unknown,
    /// the rate limit is exhausted across retries, or the response body
    /// does not contain a text block.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.request(prompt, SYSTEM_PROMPT.to_string()).await
    }

    /// Generate output constrained to a JSON schema via the system prompt
    pub async fn generate_structured(
        &self,
        prompt: &str,
        schema: &str,
    ) -> Result<String, LlmError> {
        let system = format!(
            "{} Respond with a single JSON object matching this schema, and \
             nothing else:\n{}",
            SYSTEM_PROMPT, schema
        );
        self.request(prompt, system).await
    }

    async fn request(&self, prompt: &str, system: String) -> Result<String, LlmError> {
        let url = format!("{}/v1/messages", self.endpoint);

        let request_body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            temperature: 0.3,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt.to_string(),
            }],
        };

        // Retry with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return match response.json::<MessagesResponse>().await {
                            Ok(body) => body
                                .content
                                .first()
                                .map(|block| block.text.trim().to_string())
                                .ok_or_else(|| {
                                    LlmError::InvalidResponse(
                                        "Response contained no content blocks".to_string(),
                                    )
                                }),
                            Err(e) => Err(LlmError::InvalidResponse(format!(
                                "Failed to parse response: {}",
                                e
                            ))),
                        };
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    fn block_on<F, T>(&self, future: F) -> Result<T, LlmError>
    where
        F: std::future::Future<Output = Result<T, LlmError>>,
    {
        // The trait is synchronous; callers run it via spawn_blocking
        match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime.block_on(future),
            Err(e) => Err(LlmError::Other(format!("Failed to start runtime: {}", e))),
        }
    }
}

impl LlmBackend for AnthropicBackend {
    type Error = LlmError;

    fn name(&self) -> &str {
        "anthropic"
    }

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.block_on(self.generate(prompt))
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        self.block_on(self.generate_structured(prompt, schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_creation() {
        let backend = AnthropicBackend::new("key", "claude-3-haiku-20240307");
        assert_eq!(backend.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(backend.model, "claude-3-haiku-20240307");
        assert_eq!(backend.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_backend_default_model() {
        let backend = AnthropicBackend::default_model("key");
        assert_eq!(backend.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_backend_builders() {
        let backend = AnthropicBackend::default_model("key")
            .with_endpoint("http://localhost:8089")
            .with_max_retries(5);
        assert_eq!(backend.endpoint, "http://localhost:8089");
        assert_eq!(backend.max_retries, 5);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_errors() {
        let backend = AnthropicBackend::default_model("key")
            .with_endpoint("http://127.0.0.1:9")
            .with_max_retries(1);

        let result = backend.generate("test").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    // Integration test (requires a live API key)
    #[tokio::test]
    #[ignore]
    async fn test_generate_integration() {
        let key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
        let backend = AnthropicBackend::default_model(key);
        let result = backend.generate("Say 'hello' and nothing else").await;

        if let Ok(response) = result {
            assert!(!response.is_empty());
        }
    }
}
