//! Accuracy report types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accuracy of one document's extraction against ground truth.
///
/// Created on demand by the document scorer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    /// Weighted mean accuracy over the union of extracted and ground-truth
    /// fields, in [0, 1]
    pub overall_accuracy: f64,
    /// Per-field similarity scores, in [0, 1]
    pub field_accuracies: BTreeMap<String, f64>,
    /// Size of the union of extracted and ground-truth keys
    pub total_fields: usize,
    /// Number of fields scoring exactly 1.0
    pub perfect_matches: usize,
}

/// Corpus-level summary of many per-document reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAccuracyReport {
    /// Unweighted mean of per-document overall accuracy
    pub batch_accuracy: f64,
    /// Mean per-field accuracy, over only the documents that scored that
    /// field
    pub field_breakdown: BTreeMap<String, f64>,
    /// Number of documents in the batch
    pub total_documents: usize,
    /// Documents whose overall accuracy was exactly 1.0
    pub documents_with_perfect_score: usize,
}

impl BatchAccuracyReport {
    /// The summary of an empty batch.
    pub fn empty() -> Self {
        Self {
            batch_accuracy: 0.0,
            field_breakdown: BTreeMap::new(),
            total_documents: 0,
            documents_with_perfect_score: 0,
        }
    }
}
