//! Corpus-level accuracy aggregation

use shipdoc_domain::{AccuracyReport, BatchAccuracyReport};
use std::collections::BTreeMap;

/// Summarize per-document reports into one batch report.
///
/// Every document counts equally regardless of its field count. A field's
/// breakdown averages only the documents that actually scored that field;
/// documents lacking it are excluded from the mean, not treated as zero.
/// This is a pure fold; no coordination is needed when reports were
/// produced on parallel workers.
pub fn score_batch(reports: &[AccuracyReport]) -> BatchAccuracyReport {
    if reports.is_empty() {
        return BatchAccuracyReport::empty();
    }

    let mut total_accuracy = 0.0;
    let mut field_sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut documents_with_perfect_score = 0;

    for report in reports {
        total_accuracy += report.overall_accuracy;
        if report.overall_accuracy == 1.0 {
            documents_with_perfect_score += 1;
        }
        for (field, accuracy) in &report.field_accuracies {
            let entry = field_sums.entry(field.clone()).or_insert((0.0, 0));
            entry.0 += accuracy;
            entry.1 += 1;
        }
    }

    let field_breakdown = field_sums
        .into_iter()
        .map(|(field, (sum, count))| (field, sum / count as f64))
        .collect();

    BatchAccuracyReport {
        batch_accuracy: total_accuracy / reports.len() as f64,
        field_breakdown,
        total_documents: reports.len(),
        documents_with_perfect_score,
    }
}
