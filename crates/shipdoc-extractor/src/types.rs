//! Intermediate types produced by primary extraction sources

use shipdoc_domain::{CanonicalField, FieldValue, LineItem};
use std::collections::BTreeMap;

/// A validated candidate payload from a primary source, before
/// reconciliation merges it into the record.
///
/// Only schema-conforming payloads are ever constructed; a malformed
/// response is rejected whole so no partial data leaks into the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPayload {
    /// Normalized top-level field values, canonical keys only
    pub fields: BTreeMap<CanonicalField, FieldValue>,
    /// Raw line items, retained unprocessed for the aggregator
    pub items: Vec<LineItem>,
}

impl DocumentPayload {
    /// True when the payload carries neither fields nor items.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.items.is_empty()
    }
}
