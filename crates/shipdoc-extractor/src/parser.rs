//! Parse LLM output into document payloads

use crate::error::ExtractorError;
use crate::normalize::{canonical_key, normalize_key, normalize_value, parse_leading_number};
use crate::types::DocumentPayload;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use shipdoc_domain::{CanonicalField, FieldValue, LineItem};
use tracing::warn;

static RESULT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<result>\s*(.*?)\s*</result>").expect("valid regex"));

/// Parse a combined LLM response into a validated payload.
///
/// Any schema violation rejects the whole payload; step 1 of the
/// reconciliation never carries partial data out of a malformed response.
pub fn parse_payload(response: &str) -> Result<DocumentPayload, ExtractorError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)?;
    let obj = json
        .as_object()
        .ok_or_else(|| ExtractorError::InvalidFormat("Expected JSON object".to_string()))?;

    let mut payload = DocumentPayload::default();

    for (raw_key, value) in obj {
        if normalize_key(raw_key) == "items" {
            payload.items = parse_items(value)?;
            continue;
        }

        let Some(field) = canonical_key(raw_key) else {
            // Unknown keys are tolerated, matching a schema that ignores extras
            continue;
        };

        let raw_value = scalar_value(value).ok_or_else(|| {
            ExtractorError::InvalidFormat(format!(
                "Field '{}' must be a string, number, or null",
                raw_key
            ))
        })?;
        let normalized = normalize_value(field, &raw_value);
        if !normalized.is_empty() {
            payload.fields.insert(field, normalized);
        }
    }

    Ok(payload)
}

/// Parse one per-field sub-query response into a value for that field.
///
/// Responses wrap the answer in `<result>` tags; "Not found" and blanks
/// yield nothing rather than an error.
pub fn parse_field_response(field: CanonicalField, response: &str) -> Option<FieldValue> {
    let answer = RESULT_TAG
        .captures(response)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| response.trim().to_string());

    let answer = answer.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("not found")
        || answer.eq_ignore_ascii_case("n/a")
        || answer.eq_ignore_ascii_case("none")
    {
        return None;
    }

    let normalized = normalize_value(field, &FieldValue::from(answer));
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Extract JSON from a response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, ExtractorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(ExtractorError::InvalidFormat("Empty code block".to_string()));
        }
        // Skip the opening fence (``` or ```json) and the closing fence
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_items(value: &Value) -> Result<Vec<LineItem>, ExtractorError> {
    let array = value
        .as_array()
        .ok_or_else(|| ExtractorError::InvalidFormat("'items' must be an array".to_string()))?;

    let mut items = Vec::with_capacity(array.len());
    for (idx, entry) in array.iter().enumerate() {
        let obj = entry.as_object().ok_or_else(|| {
            ExtractorError::InvalidFormat(format!("Item {} is not a JSON object", idx))
        })?;

        let mut item = LineItem::default();
        for (raw_key, member) in obj {
            match normalize_key(raw_key).as_str() {
                "description" => {
                    item.description = match member {
                        Value::Null => None,
                        Value::String(s) if s.trim().is_empty() => None,
                        Value::String(s) => Some(s.trim().to_string()),
                        other => {
                            return Err(ExtractorError::InvalidFormat(format!(
                                "Item {} description has invalid type: {}",
                                idx, other
                            )))
                        }
                    }
                }
                "quantity" => item.quantity = numeric_member(member, idx, raw_key)?,
                "gross_weight" | "weight" => {
                    item.gross_weight = numeric_member(member, idx, raw_key)?
                }
                "unit_price" | "price" => item.unit_price = numeric_member(member, idx, raw_key)?,
                other => warn!("Item {} has unrecognized member '{}'", idx, other),
            }
        }
        items.push(item);
    }
    Ok(items)
}

fn numeric_member(value: &Value, idx: usize, key: &str) -> Result<Option<f64>, ExtractorError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        // LLMs like units: "50 kg", "$12.50"
        Value::String(s) => Ok(parse_leading_number(s)),
        other => Err(ExtractorError::InvalidFormat(format!(
            "Item {} member '{}' has invalid type: {}",
            idx, key, other
        ))),
    }
}

fn scalar_value(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Null => Some(FieldValue::Null),
        Value::String(s) => Some(FieldValue::Text(s.clone())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(FieldValue::Integer(i))
            } else {
                n.as_f64().map(FieldValue::Number)
            }
        }
        _ => None,
    }
}
