//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use shipdoc_extractor::ReconcilerConfig;
use shipdoc_scorer::ScoringConfig;
use std::fs;
use std::path::Path;

/// CLI configuration.
///
/// Loaded from an explicit `--config` TOML file; every section falls back
/// to its defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Extraction reconciler section
    #[serde(default)]
    pub reconciler: ReconcilerConfig,

    /// Accuracy scoring section
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    #[default]
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Load configuration from a TOML file and validate its sections.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the reconciler and scoring sections.
    pub fn validate(&self) -> Result<()> {
        self.reconciler.validate().map_err(CliError::Config)?;
        self.scoring.validate().map_err(CliError::Config)?;
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
