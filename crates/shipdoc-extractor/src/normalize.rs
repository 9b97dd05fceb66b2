//! Field name and value normalization
//!
//! Maps alias key spellings to the canonical field set and coerces raw
//! values to the semantic type each field expects. Everything here is pure
//! and infallible: the worst outcome for a value is `Null` or a best-effort
//! string, never an error, so a single unparsable field can never abort an
//! extraction.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use shipdoc_domain::{CanonicalField, FieldValue};

static KEY_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_ ]+").expect("valid regex"));
static LEADING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+]?\d*\.?\d+").expect("valid regex"));
static COMPACT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})(\d{2})(\d{2})\b").expect("valid regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static STRING_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9 \-/]").expect("valid regex"));

/// Date layouts attempted in order when coercing a date value.
const DATE_LAYOUTS: [&str; 10] = [
    "%Y-%m-%d",
    "%d-%m-%Y",
    "%m-%d-%Y",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Normalize a raw key: lower-case, strip noise, collapse spaces to
/// underscores, then resolve aliases. Unrecognized keys pass through
/// unchanged and are dropped by the caller if not canonical.
pub fn normalize_key(key: &str) -> String {
    let key = key.trim().to_lowercase();
    let key = KEY_NOISE.replace_all(&key, "");
    let key = key.trim().replace(' ', "_");
    resolve_alias(&key).to_string()
}

/// Resolve a canonical field from an arbitrary key spelling.
pub fn canonical_key(key: &str) -> Option<CanonicalField> {
    CanonicalField::from_name(&normalize_key(key))
}

fn resolve_alias(key: &str) -> &str {
    match key {
        "bill_of_lading_number" | "bill_of_lading_no" | "bill_of_lading" | "bol_number"
        | "bol" => "bill_of_lading_number",
        "container_number" | "container_no" | "container" => "container_number",
        "consignee_name" | "consignee" => "consignee_name",
        "consignee_address" => "consignee_address",
        "date" | "shipment_date" | "shipping_date" => "date",
        "line_items_count" | "line_items" | "items_count" => "line_items_count",
        "average_gross_weight" | "avg_gross_weight" => "average_gross_weight",
        "average_price" | "avg_price" => "average_price",
        other => other,
    }
}

/// Coerce a raw value to the type its field expects.
pub fn normalize_value(field: CanonicalField, value: &FieldValue) -> FieldValue {
    if value.is_null() {
        return FieldValue::Null;
    }
    match field {
        CanonicalField::LineItemsCount => match numeric_view(value) {
            Some(n) => FieldValue::Integer(n.round() as i64),
            None => FieldValue::Null,
        },
        CanonicalField::AverageGrossWeight | CanonicalField::AveragePrice => {
            match numeric_view(value) {
                Some(n) => FieldValue::Number(n),
                None => FieldValue::Null,
            }
        }
        CanonicalField::Date => {
            let raw = value.to_string();
            match normalize_date(&raw) {
                Some(iso) => FieldValue::Text(iso),
                None => text_or_null(normalize_str(&raw, false)),
            }
        }
        CanonicalField::BillOfLadingNumber | CanonicalField::ContainerNumber => {
            text_or_null(normalize_str(&value.to_string(), true).to_uppercase())
        }
        CanonicalField::ConsigneeName | CanonicalField::ConsigneeAddress => {
            text_or_null(normalize_str(&value.to_string(), false))
        }
    }
}

fn numeric_view(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Integer(_) | FieldValue::Number(_) => value.as_f64(),
        FieldValue::Text(s) => parse_leading_number(s),
        FieldValue::Null => None,
    }
}

fn text_or_null(s: String) -> FieldValue {
    if s.is_empty() {
        FieldValue::Null
    } else {
        FieldValue::Text(s)
    }
}

/// Parse the leading numeric substring, tolerating thousands separators and
/// currency-symbol prefixes.
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    LEADING_NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Try the known date layouts; first success wins, rendered as ISO.
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    for layout in DATE_LAYOUTS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, layout) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    // Compact YYYYMMDD
    if let Some(caps) = COMPACT_DATE.captures(raw) {
        let (year, month, day) = (
            caps[1].parse::<i32>().ok()?,
            caps[2].parse::<u32>().ok()?,
            caps[3].parse::<u32>().ok()?,
        );
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    None
}

/// Collapse whitespace, strip characters outside `[A-Za-z0-9 -/]`, and
/// lower-case unless told to preserve case.
pub fn normalize_str(raw: &str, keep_case: bool) -> String {
    let s = WHITESPACE.replace_all(raw.trim(), " ").to_string();
    let s = if keep_case { s } else { s.to_lowercase() };
    STRING_NOISE.replace_all(&s, "").trim().to_string()
}
