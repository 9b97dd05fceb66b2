//! Scoring configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the accuracy scorer.
///
/// The partial-credit constants are empirical values carried over from the
/// system this replaces; they are configuration, not constants, because no
/// derivation for them is documented.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Per-field importance weights applied when combining field accuracies
    pub field_weights: BTreeMap<String, f64>,

    /// Weight used for fields absent from the table
    pub default_weight: f64,

    /// Credit given when both sides contain a date but the dates differ
    pub date_partial_credit: f64,

    /// Free-text ratios at or below this are clamped to 0.0
    pub text_floor: f64,
}

impl ScoringConfig {
    /// Weight for a field, falling back to the default.
    pub fn weight_for(&self, field: &str) -> f64 {
        self.field_weights
            .get(field)
            .copied()
            .unwrap_or(self.default_weight)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.date_partial_credit) {
            return Err("date_partial_credit must be in [0.0, 1.0]".to_string());
        }
        if !(0.0..=1.0).contains(&self.text_floor) {
            return Err("text_floor must be in [0.0, 1.0]".to_string());
        }
        if self.default_weight < 0.0 {
            return Err("default_weight must be non-negative".to_string());
        }
        if let Some((field, w)) = self.field_weights.iter().find(|(_, w)| **w < 0.0) {
            return Err(format!("weight for '{}' must be non-negative, got {}", field, w));
        }
        Ok(())
    }

    /// Preset that treats every field equally (weights disabled).
    pub fn unweighted() -> Self {
        Self {
            field_weights: BTreeMap::new(),
            default_weight: 1.0,
            ..Self::default()
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

impl Default for ScoringConfig {
    fn default() -> Self {
        let field_weights = [
            ("bill_of_lading_number", 1.0),
            ("date", 0.9),
            ("date_of_shipment", 0.9),
            ("shipper_name", 0.8),
            ("consignee_name", 0.8),
            ("container_number", 0.8),
            ("container_numbers", 0.8),
            ("consignee_address", 0.7),
            ("port_of_loading", 0.7),
            ("port_of_discharge", 0.7),
            ("vessel_name", 0.6),
            ("voyage_number", 0.6),
            ("line_items_count", 0.6),
            ("cargo_description", 0.5),
            ("average_gross_weight", 0.5),
            ("average_price", 0.5),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        Self {
            field_weights,
            default_weight: 0.5,
            date_partial_credit: 0.7,
            text_floor: 0.3,
        }
    }
}
