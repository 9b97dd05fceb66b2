//! Field-map input handling.
//!
//! Ground-truth and prediction files are JSON objects of field → value
//! pairs, sometimes nested under an `extracted_data` wrapper by upstream
//! tooling. Keys resolve through the canonical alias table and values are
//! coerced to each field's expected type before scoring.

use crate::error::{CliError, Result};
use serde_json::Value;
use shipdoc_domain::FieldValue;
use shipdoc_extractor::{canonical_key, normalize_value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Read a canonical field map from a JSON file.
pub fn read_field_map(path: &Path) -> Result<BTreeMap<String, FieldValue>> {
    let contents = fs::read_to_string(path)?;
    let json: Value = serde_json::from_str(&contents)?;
    field_map_from_json(&json).ok_or_else(|| {
        CliError::InvalidInput(format!(
            "{} does not contain a JSON object of fields",
            path.display()
        ))
    })
}

/// Build a canonical field map from a JSON value.
///
/// Non-canonical keys and non-scalar values are dropped; returns None when
/// the value is not an object at all.
pub fn field_map_from_json(json: &Value) -> Option<BTreeMap<String, FieldValue>> {
    let data = json.get("extracted_data").unwrap_or(json);
    let obj = data.as_object()?;

    let mut map = BTreeMap::new();
    for (raw_key, value) in obj {
        let Some(field) = canonical_key(raw_key) else {
            continue;
        };
        let raw_value: FieldValue = match serde_json::from_value(value.clone()) {
            Ok(v) => v,
            Err(_) => {
                warn!("dropping non-scalar value for '{}'", raw_key);
                continue;
            }
        };
        map.insert(
            field.as_str().to_string(),
            normalize_value(field, &raw_value),
        );
    }
    Some(map)
}
