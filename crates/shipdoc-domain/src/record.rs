//! Extraction records and line items

use crate::field::{CanonicalField, FieldValue};
use crate::source::{SourcedValue, StrategySource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One line item from an invoice or packing list.
///
/// Items have no identity beyond their position in the document and are
/// immutable once produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineItem {
    /// Item description
    #[serde(default)]
    pub description: Option<String>,
    /// Quantity shipped
    #[serde(default)]
    pub quantity: Option<f64>,
    /// Gross weight for this item
    #[serde(default)]
    pub gross_weight: Option<f64>,
    /// Unit price for this item
    #[serde(default)]
    pub unit_price: Option<f64>,
}

/// Numeric metrics pre-computed from spreadsheet sources by the (out of
/// scope) document text provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpreadsheetMetrics {
    /// Number of line items found in the spreadsheet
    #[serde(default)]
    pub line_items_count: Option<i64>,
    /// Mean gross weight across spreadsheet rows
    #[serde(default)]
    pub average_gross_weight: Option<f64>,
    /// Mean unit price across spreadsheet rows
    #[serde(default)]
    pub average_price: Option<f64>,
}

/// The reconciled extraction result for one document.
///
/// Every canonical field is always present (null when unfilled), each value
/// carries its provenance tag, and the record is immutable once returned by
/// the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Canonical field slots, value paired with provenance
    pub fields: BTreeMap<CanonicalField, SourcedValue>,
    /// Line items in document order, possibly empty
    pub items: Vec<LineItem>,
    /// Name of the backend that supplied the primary payload, if any
    pub llm_provider: Option<String>,
}

impl ExtractionRecord {
    /// Create a record with every canonical field null and unsourced.
    pub fn empty() -> Self {
        let fields = CanonicalField::ALL
            .iter()
            .map(|f| (*f, SourcedValue::null()))
            .collect();
        Self {
            fields,
            items: Vec::new(),
            llm_provider: None,
        }
    }

    /// The value of a canonical field.
    pub fn value(&self, field: CanonicalField) -> &FieldValue {
        // empty() seeds every canonical key, so the slot always exists
        static NULL: FieldValue = FieldValue::Null;
        self.fields.get(&field).map(|s| &s.value).unwrap_or(&NULL)
    }

    /// The provenance of a canonical field.
    pub fn source(&self, field: CanonicalField) -> StrategySource {
        self.fields
            .get(&field)
            .map(|s| s.source)
            .unwrap_or(StrategySource::None)
    }

    /// Store a value and its provenance for a field.
    pub fn set(&mut self, field: CanonicalField, value: impl Into<FieldValue>, source: StrategySource) {
        self.fields.insert(field, SourcedValue::new(value, source));
    }

    /// True when the field has not been filled by any strategy.
    pub fn is_unfilled(&self, field: CanonicalField) -> bool {
        self.value(field).is_null()
    }

    /// Flat name → value view, as consumed by the accuracy scorer.
    pub fn field_map(&self) -> BTreeMap<String, FieldValue> {
        self.fields
            .iter()
            .map(|(f, s)| (f.as_str().to_string(), s.value.clone()))
            .collect()
    }

    /// Flat name → provenance view.
    pub fn provenance_map(&self) -> BTreeMap<String, StrategySource> {
        self.fields
            .iter()
            .map(|(f, s)| (f.as_str().to_string(), s.source))
            .collect()
    }
}

impl Default for ExtractionRecord {
    fn default() -> Self {
        Self::empty()
    }
}
