//! Configuration for the Reconciler

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the primary strategy queries its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryMode {
    /// One structured request returning all fields plus line items
    Combined,
    /// One independent sub-query per text field, failures isolated per field
    PerField,
}

impl Default for QueryMode {
    fn default() -> Self {
        QueryMode::Combined
    }
}

/// Configuration for the Reconciler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Maximum input text length (characters)
    pub max_text_length: usize,

    /// Characters of document text included in LLM prompts
    pub prompt_text_limit: usize,

    /// Maximum time for one primary-source attempt (seconds)
    pub llm_timeout_secs: u64,

    /// Combined payload request or per-field sub-queries
    pub query_mode: QueryMode,
}

impl ReconcilerConfig {
    /// Get the per-attempt timeout as a Duration
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.prompt_text_limit == 0 {
            return Err("prompt_text_limit must be greater than 0".to_string());
        }
        if self.prompt_text_limit > self.max_text_length {
            return Err("prompt_text_limit cannot exceed max_text_length".to_string());
        }
        if self.llm_timeout_secs == 0 {
            return Err("llm_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ReconcilerConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            max_text_length: 50_000,
            prompt_text_limit: 3_000,
            llm_timeout_secs: 30,
            query_mode: QueryMode::Combined,
        }
    }
}

impl ReconcilerConfig {
    /// Aggressive preset: shorter timeout, smaller prompts
    pub fn aggressive() -> Self {
        Self {
            max_text_length: 20_000,
            prompt_text_limit: 2_000,
            llm_timeout_secs: 15,
            query_mode: QueryMode::Combined,
        }
    }

    /// Lenient preset: longer timeout, more document context per prompt
    pub fn lenient() -> Self {
        Self {
            max_text_length: 100_000,
            prompt_text_limit: 8_000,
            llm_timeout_secs: 120,
            query_mode: QueryMode::Combined,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ReconcilerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ReconcilerConfig::aggressive().validate().is_ok());
        assert!(ReconcilerConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_prompt_limit() {
        let mut config = ReconcilerConfig::default();
        config.prompt_text_limit = config.max_text_length + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = ReconcilerConfig::default();
        config.llm_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ReconcilerConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ReconcilerConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.max_text_length, parsed.max_text_length);
        assert_eq!(config.prompt_text_limit, parsed.prompt_text_limit);
        assert_eq!(config.llm_timeout_secs, parsed.llm_timeout_secs);
        assert_eq!(config.query_mode, parsed.query_mode);
    }
}
