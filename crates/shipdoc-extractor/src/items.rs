//! Line-item aggregation

use shipdoc_domain::LineItem;

/// Summary statistics computed from a document's line items.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemAggregates {
    /// Number of items
    pub count: usize,
    /// Mean of the non-null gross weights, when any item supplies one
    pub average_gross_weight: Option<f64>,
    /// Mean of the non-null unit prices, when any item supplies one
    pub average_price: Option<f64>,
}

/// Aggregate a sequence of line items.
///
/// Items missing a weight or price are excluded from that average's
/// denominator, not treated as zero. Averages over an empty list are None,
/// never zero or NaN.
pub fn aggregate_items(items: &[LineItem]) -> ItemAggregates {
    ItemAggregates {
        count: items.len(),
        average_gross_weight: mean(items.iter().filter_map(|item| item.gross_weight)),
        average_price: mean(items.iter().filter_map(|item| item.unit_price)),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    if count > 0 {
        Some(sum / count as f64)
    } else {
        None
    }
}
