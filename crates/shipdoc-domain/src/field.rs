//! The canonical field set and field values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the eight shipment attributes the system extracts.
///
/// The field set is fixed; arbitrary user-defined schemas are a non-goal.
/// Alias spellings ("bol_number", "consignee") are resolved to these names
/// by the field normalizer in the extraction layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    /// Bill of lading number
    BillOfLadingNumber,
    /// ISO-style container number
    ContainerNumber,
    /// Consignee name
    ConsigneeName,
    /// Consignee address
    ConsigneeAddress,
    /// Shipment or issue date
    Date,
    /// Number of line items
    LineItemsCount,
    /// Mean gross weight across line items
    AverageGrossWeight,
    /// Mean unit price across line items
    AveragePrice,
}

impl CanonicalField {
    /// All canonical fields, in record order.
    pub const ALL: [CanonicalField; 8] = [
        CanonicalField::BillOfLadingNumber,
        CanonicalField::ContainerNumber,
        CanonicalField::ConsigneeName,
        CanonicalField::ConsigneeAddress,
        CanonicalField::Date,
        CanonicalField::LineItemsCount,
        CanonicalField::AverageGrossWeight,
        CanonicalField::AveragePrice,
    ];

    /// The five non-numeric fields, the targets of the rule-based fallback.
    pub const TEXT_FIELDS: [CanonicalField; 5] = [
        CanonicalField::BillOfLadingNumber,
        CanonicalField::ContainerNumber,
        CanonicalField::ConsigneeName,
        CanonicalField::ConsigneeAddress,
        CanonicalField::Date,
    ];

    /// The three numeric fields derived from line items or spreadsheets.
    pub const NUMERIC_FIELDS: [CanonicalField; 3] = [
        CanonicalField::LineItemsCount,
        CanonicalField::AverageGrossWeight,
        CanonicalField::AveragePrice,
    ];

    /// The snake_case field name used in maps and payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::BillOfLadingNumber => "bill_of_lading_number",
            CanonicalField::ContainerNumber => "container_number",
            CanonicalField::ConsigneeName => "consignee_name",
            CanonicalField::ConsigneeAddress => "consignee_address",
            CanonicalField::Date => "date",
            CanonicalField::LineItemsCount => "line_items_count",
            CanonicalField::AverageGrossWeight => "average_gross_weight",
            CanonicalField::AveragePrice => "average_price",
        }
    }

    /// Resolve an already-canonical name. Alias resolution is the field
    /// normalizer's job; this only accepts exact canonical spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        CanonicalField::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    /// Whether this is one of the three numeric fields.
    pub fn is_numeric(&self) -> bool {
        CanonicalField::NUMERIC_FIELDS.contains(self)
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalField::from_name(s).ok_or_else(|| format!("unknown canonical field: {}", s))
    }
}

/// An extracted field value.
///
/// Values are strings, numbers, or null; dates travel as strings so that
/// unparseable dates survive for downstream fuzzy comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Missing or unparseable
    Null,
    /// Whole number (line item counts)
    Integer(i64),
    /// Floating value (weights, prices)
    Number(f64),
    /// Free text, identifier, or date string
    Text(String),
}

impl FieldValue {
    /// True when the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// True when the value carries no usable content (null or blank text).
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the value, when it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text view of the value, when it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(FieldValue::Null)
    }
}
