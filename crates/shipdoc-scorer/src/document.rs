//! Per-document accuracy scoring

use crate::config::ScoringConfig;
use crate::similarity::field_similarity;
use shipdoc_domain::{AccuracyReport, FieldValue};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Scores one document's extracted field map against ground truth.
pub struct DocumentScorer {
    config: ScoringConfig,
}

impl DocumentScorer {
    /// Create a scorer with the given configuration
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Create a scorer with default configuration
    pub fn default_config() -> Self {
        Self::new(ScoringConfig::default())
    }

    /// Compute an accuracy report over the union of extracted and
    /// ground-truth keys.
    ///
    /// A field present on only one side still contributes to the union;
    /// the missing side is treated as null, so it scores 0.0 unless both
    /// sides are missing it entirely.
    pub fn score(
        &self,
        extracted: &BTreeMap<String, FieldValue>,
        ground_truth: &BTreeMap<String, FieldValue>,
    ) -> AccuracyReport {
        let all_fields: BTreeSet<&String> =
            extracted.keys().chain(ground_truth.keys()).collect();

        let mut field_accuracies = BTreeMap::new();
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;

        for field in &all_fields {
            let extracted_value = extracted.get(*field).cloned().unwrap_or(FieldValue::Null);
            let ground_truth_value =
                ground_truth.get(*field).cloned().unwrap_or(FieldValue::Null);

            let accuracy =
                field_similarity(&extracted_value, &ground_truth_value, field, &self.config);
            field_accuracies.insert((*field).clone(), accuracy);

            let weight = self.config.weight_for(field);
            weighted_sum += accuracy * weight;
            total_weight += weight;

            debug!("field '{}' scored {:.3} (weight {:.2})", field, accuracy, weight);
        }

        let overall_accuracy = if total_weight > 0.0 {
            weighted_sum / total_weight
        } else {
            0.0
        };
        let perfect_matches = field_accuracies.values().filter(|a| **a == 1.0).count();

        AccuracyReport {
            overall_accuracy,
            field_accuracies,
            total_fields: all_fields.len(),
            perfect_matches,
        }
    }
}

impl Default for DocumentScorer {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, FieldValue)]) -> BTreeMap<String, FieldValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_identical_maps_score_one() {
        let scorer = DocumentScorer::default_config();
        let data = map(&[
            ("bill_of_lading_number", FieldValue::from("ABC12345")),
            ("consignee_name", FieldValue::from("John Doe")),
        ]);

        let report = scorer.score(&data, &data);
        assert_eq!(report.overall_accuracy, 1.0);
        assert_eq!(report.total_fields, 2);
        assert_eq!(report.perfect_matches, 2);
    }

    #[test]
    fn test_weights_cancel_when_accuracies_are_equal() {
        // Two perfect fields with different weights still combine to 1.0;
        // weights only matter when accuracies differ.
        let scorer = DocumentScorer::default_config();
        let data = map(&[
            ("bill_of_lading_number", FieldValue::from("ABC12345")), // weight 1.0
            ("cargo_description", FieldValue::from("steel coils")),  // weight 0.5
        ]);

        let report = scorer.score(&data, &data);
        assert_eq!(report.overall_accuracy, 1.0);
    }

    #[test]
    fn test_weights_matter_when_accuracies_differ() {
        let scorer = DocumentScorer::default_config();
        let extracted = map(&[
            ("bill_of_lading_number", FieldValue::from("ABC12345")), // weight 1.0, hit
            ("cargo_description", FieldValue::Null),                 // weight 0.5, miss
        ]);
        let truth = map(&[
            ("bill_of_lading_number", FieldValue::from("ABC12345")),
            ("cargo_description", FieldValue::from("steel coils")),
        ]);

        let report = scorer.score(&extracted, &truth);
        // (1.0 * 1.0 + 0.0 * 0.5) / 1.5
        assert!((report.overall_accuracy - 1.0 / 1.5).abs() < 1e-9);
        assert_eq!(report.perfect_matches, 1);
    }

    #[test]
    fn test_union_includes_one_sided_fields() {
        let scorer = DocumentScorer::default_config();
        let extracted = map(&[("bill_of_lading_number", FieldValue::from("ABC12345"))]);
        let truth = map(&[("consignee_name", FieldValue::from("John Doe"))]);

        let report = scorer.score(&extracted, &truth);
        assert_eq!(report.total_fields, 2);
        // Each side is null for the other's field
        assert_eq!(report.field_accuracies["bill_of_lading_number"], 0.0);
        assert_eq!(report.field_accuracies["consignee_name"], 0.0);
        assert_eq!(report.perfect_matches, 0);
    }

    #[test]
    fn test_field_null_on_both_sides_is_perfect() {
        let scorer = DocumentScorer::default_config();
        let extracted = map(&[("date", FieldValue::Null)]);
        let truth = map(&[("date", FieldValue::Null)]);

        let report = scorer.score(&extracted, &truth);
        assert_eq!(report.overall_accuracy, 1.0);
        assert_eq!(report.perfect_matches, 1);
    }

    #[test]
    fn test_empty_maps_score_zero() {
        let scorer = DocumentScorer::default_config();
        let report = scorer.score(&BTreeMap::new(), &BTreeMap::new());
        assert_eq!(report.overall_accuracy, 0.0);
        assert_eq!(report.total_fields, 0);
        assert_eq!(report.perfect_matches, 0);
    }
}
