//! Per-field provenance tracking

use crate::field::FieldValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which extraction strategy supplied a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategySource {
    /// Primary structured extractor (LLM backend)
    Llm,
    /// Regex/heuristic fallback against the raw text
    Rule,
    /// Pre-computed spreadsheet metrics
    Spreadsheet,
    /// Derived by the line-item aggregator, never directly extracted
    Computed,
    /// No strategy produced a value
    None,
}

impl StrategySource {
    /// Whether any strategy actually supplied the value.
    pub fn is_filled(&self) -> bool {
        !matches!(self, StrategySource::None)
    }
}

impl Default for StrategySource {
    fn default() -> Self {
        StrategySource::None
    }
}

impl fmt::Display for StrategySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrategySource::Llm => "llm",
            StrategySource::Rule => "rule",
            StrategySource::Spreadsheet => "spreadsheet",
            StrategySource::Computed => "computed",
            StrategySource::None => "none",
        };
        f.write_str(s)
    }
}

/// A field value paired with its provenance tag.
///
/// Keeping the tag beside the value (instead of in a parallel map) means the
/// two can never drift out of sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedValue {
    /// The extracted value
    pub value: FieldValue,
    /// Which strategy produced it
    pub source: StrategySource,
}

impl SourcedValue {
    /// Pair a value with its source.
    pub fn new(value: impl Into<FieldValue>, source: StrategySource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    /// An unfilled slot: null value, no source.
    pub fn null() -> Self {
        Self {
            value: FieldValue::Null,
            source: StrategySource::None,
        }
    }

    /// True when no strategy has filled this slot yet.
    pub fn is_unfilled(&self) -> bool {
        self.value.is_null()
    }
}

impl Default for SourcedValue {
    fn default() -> Self {
        Self::null()
    }
}
