//! Field-type-aware similarity functions

use crate::config::ScoringConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use shipdoc_domain::FieldValue;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w]").expect("valid regex"));

/// Date-shaped substrings, searched in this order on both sides.
static DATE_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d{4}-\d{2}-\d{2}",
        r"\d{2}[-/]\d{2}[-/]\d{4}",
        r"\d{2}[-/]\d{2}[-/]\d{2}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// How a field should be compared, keyed by its semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Identifiers: punctuation-insensitive, near-exact matching
    Alphanumeric,
    /// Dates: semantic rather than textual equivalence
    Date,
    /// Names, ports, addresses, descriptions: fuzzy with a noise floor
    FreeText,
}

impl FieldKind {
    /// Classify a field name. Unrecognized fields compare as free text.
    pub fn classify(field: &str) -> Self {
        match field {
            "bill_of_lading_number" | "container_number" | "container_numbers"
            | "voyage_number" => FieldKind::Alphanumeric,
            "date" | "date_of_shipment" => FieldKind::Date,
            _ => FieldKind::FreeText,
        }
    }
}

/// Similarity in [0, 1] between an extracted value and a ground-truth value
/// for one field.
///
/// Missing data is never partially credited: both null scores 1.0, exactly
/// one null scores 0.0. Trimmed case-insensitive equality short-circuits
/// before any specialized comparator runs.
pub fn field_similarity(
    extracted: &FieldValue,
    ground_truth: &FieldValue,
    field: &str,
    config: &ScoringConfig,
) -> f64 {
    match (extracted.is_null(), ground_truth.is_null()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let extracted = extracted.to_string().trim().to_lowercase();
    let ground_truth = ground_truth.to_string().trim().to_lowercase();

    if extracted == ground_truth {
        return 1.0;
    }

    match FieldKind::classify(field) {
        FieldKind::Alphanumeric => alphanumeric_similarity(&extracted, &ground_truth),
        FieldKind::Date => date_similarity(&extracted, &ground_truth, config),
        FieldKind::FreeText => text_similarity(&extracted, &ground_truth, config),
    }
}

/// Identifier comparison: strip everything outside `\w`, then exact match
/// or raw sequence ratio with no floor.
fn alphanumeric_similarity(extracted: &str, ground_truth: &str) -> f64 {
    let extracted_clean = NON_WORD.replace_all(extracted, "");
    let ground_truth_clean = NON_WORD.replace_all(ground_truth, "");

    if extracted_clean == ground_truth_clean {
        return 1.0;
    }
    sequence_ratio(&extracted_clean, &ground_truth_clean)
}

/// Date comparison: pattern-extract date-shaped substrings from both sides
/// and compare the first match from each. Partial credit when both contain
/// a date but the dates differ; free-text fallback when either side has no
/// recognizable date.
fn date_similarity(extracted: &str, ground_truth: &str, config: &ScoringConfig) -> f64 {
    let extracted_dates = find_date_shapes(extracted);
    let ground_truth_dates = find_date_shapes(ground_truth);

    match (extracted_dates.first(), ground_truth_dates.first()) {
        (Some(a), Some(b)) if a == b => 1.0,
        (Some(_), Some(_)) => config.date_partial_credit,
        _ => text_similarity(extracted, ground_truth, config),
    }
}

fn find_date_shapes(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for shape in DATE_SHAPES.iter() {
        for m in shape.find_iter(text) {
            found.push(m.as_str().to_string());
        }
    }
    found
}

/// Free-text comparison: sequence ratio, with very dissimilar text treated
/// as wrong rather than slightly right.
fn text_similarity(extracted: &str, ground_truth: &str, config: &ScoringConfig) -> f64 {
    let ratio = sequence_ratio(extracted, ground_truth);
    if ratio > config.text_floor {
        ratio
    } else {
        0.0
    }
}

/// Character-level sequence similarity: twice the total length of the
/// longest matching blocks divided by the combined length of both strings
/// (Ratcliff/Obershelp).
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = matching_total(&a, &b);
    2.0 * matches as f64 / total as f64
}

/// Total matched characters: longest common block, then recurse on the
/// pieces to its left and right.
fn matching_total(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (ai, bi, len) = longest_match(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_total(&a[..ai], &b[..bi]) + matching_total(&a[ai + len..], &b[bi + len..])
}

/// Longest common contiguous block between `a` and `b`, earliest in `a`
/// (then `b`) on ties.
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut lengths_ending_at = vec![0usize; b.len()];

    for (i, &ca) in a.iter().enumerate() {
        let mut next = vec![0usize; b.len()];
        for (j, &cb) in b.iter().enumerate() {
            if ca == cb {
                let len = if j > 0 { lengths_ending_at[j - 1] } else { 0 } + 1;
                next[j] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        lengths_ending_at = next;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(a: &FieldValue, b: &FieldValue, field: &str) -> f64 {
        field_similarity(a, b, field, &ScoringConfig::default())
    }

    #[test]
    fn test_both_null_is_perfect() {
        assert_eq!(sim(&FieldValue::Null, &FieldValue::Null, "date"), 1.0);
    }

    #[test]
    fn test_one_null_scores_zero_both_ways() {
        let value = FieldValue::from("ABC12345");
        assert_eq!(sim(&value, &FieldValue::Null, "bill_of_lading_number"), 0.0);
        assert_eq!(sim(&FieldValue::Null, &value, "bill_of_lading_number"), 0.0);
    }

    #[test]
    fn test_exact_match_short_circuits() {
        assert_eq!(
            sim(
                &FieldValue::from("  John Doe "),
                &FieldValue::from("john doe"),
                "consignee_name"
            ),
            1.0
        );
    }

    #[test]
    fn test_alphanumeric_is_punctuation_insensitive() {
        assert_eq!(
            sim(
                &FieldValue::from("BOL-123-456"),
                &FieldValue::from("BOL123456"),
                "bill_of_lading_number"
            ),
            1.0
        );
    }

    #[test]
    fn test_alphanumeric_partial_has_no_floor() {
        let score = sim(
            &FieldValue::from("MSKU1234567"),
            &FieldValue::from("MSKU1234568"),
            "container_number",
        );
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn test_differing_dates_get_partial_credit() {
        assert_eq!(
            sim(
                &FieldValue::from("2024-09-05"),
                &FieldValue::from("2024-09-06"),
                "date"
            ),
            0.7
        );
    }

    #[test]
    fn test_embedded_date_matches_bare_date() {
        assert_eq!(
            sim(
                &FieldValue::from("shipped on 2024-09-05"),
                &FieldValue::from("2024-09-05"),
                "date"
            ),
            1.0
        );
    }

    #[test]
    fn test_date_without_shape_falls_back_to_text() {
        // Neither side contains a date-shaped substring
        let score = sim(
            &FieldValue::from("early september"),
            &FieldValue::from("early sept"),
            "date",
        );
        assert!(score > 0.0 && score < 1.0);
    }

    #[test]
    fn test_free_text_floor_clamps_to_zero() {
        assert_eq!(
            sim(
                &FieldValue::from("zzzzqqqq"),
                &FieldValue::from("aaaabbbb"),
                "consignee_name"
            ),
            0.0
        );
    }

    #[test]
    fn test_free_text_above_floor_keeps_ratio() {
        let score = sim(
            &FieldValue::from("acme shipping co"),
            &FieldValue::from("acme shipping inc"),
            "consignee_name",
        );
        assert!(score > 0.3 && score < 1.0);
    }

    #[test]
    fn test_numbers_compare_via_display() {
        assert_eq!(
            sim(
                &FieldValue::Integer(3),
                &FieldValue::Integer(3),
                "line_items_count"
            ),
            1.0
        );
        assert_eq!(
            sim(
                &FieldValue::Number(50.0),
                &FieldValue::Number(50.0),
                "average_gross_weight"
            ),
            1.0
        );
    }

    #[test]
    fn test_classification() {
        assert_eq!(
            FieldKind::classify("voyage_number"),
            FieldKind::Alphanumeric
        );
        assert_eq!(FieldKind::classify("date_of_shipment"), FieldKind::Date);
        assert_eq!(FieldKind::classify("port_of_loading"), FieldKind::FreeText);
        assert_eq!(FieldKind::classify("anything_else"), FieldKind::FreeText);
    }

    #[test]
    fn test_sequence_ratio_identical() {
        assert_eq!(sequence_ratio("abcdef", "abcdef"), 1.0);
    }

    #[test]
    fn test_sequence_ratio_disjoint() {
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_sequence_ratio_both_empty() {
        assert_eq!(sequence_ratio("", ""), 1.0);
    }

    #[test]
    fn test_sequence_ratio_known_value() {
        // blocks: "abcd" (4 of 9+4 chars)
        let ratio = sequence_ratio("abcd", "xxabcdxxx");
        assert!((ratio - 8.0 / 13.0).abs() < 1e-9);
    }
}
