//! Regex/heuristic fallback extractors
//!
//! Last-resort extraction straight from the raw document text, used for
//! fields the primary strategy left null. Matches are returned as they
//! appear in the document; dates in particular are not converted.

use once_cell::sync::Lazy;
use regex::Regex;

static BILL_OF_LADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:bill\s+of\s+lading|b/l|bol)\b(?:\s*(?:no|number|num))?\.?\s*[-:#]?\s*([A-Za-z0-9][A-Za-z0-9-]{3,})")
        .expect("valid regex")
});

// ISO 6346 style: 4-letter owner/category code then 7 digits
static CONTAINER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z]{4}\d{7})\b").expect("valid regex"));

/// Date shapes in priority order; the first pattern with a match wins.
static DATE_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b\d{4}-\d{2}-\d{2}\b",
        r"\b\d{2}/\d{2}/\d{4}\b",
        r"\b\d{2}-\d{2}-\d{4}\b",
        r"(?i)\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2},?\s+\d{4}",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static CONSIGNEE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*consignee(?:\s+name)?\s*[:\-]?\s*(.*)$").expect("valid regex")
});

static COMPETING_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:shipper|notify|buyer|supplier)\b").expect("valid regex")
});

/// Find a bill-of-lading number: a label ("bill of lading", "B/L", "BOL")
/// followed by an alphanumeric token.
pub fn find_bill_of_lading(text: &str) -> Option<String> {
    BILL_OF_LADING
        .captures(text)
        .map(|caps| caps[1].to_uppercase())
}

/// Find an ISO-style container number.
pub fn find_container_number(text: &str) -> Option<String> {
    CONTAINER.captures(text).map(|caps| caps[1].to_string())
}

/// Find a date, trying the shapes in priority order. The match is returned
/// unconverted.
pub fn find_date(text: &str) -> Option<String> {
    DATE_SHAPES
        .iter()
        .find_map(|shape| shape.find(text))
        .map(|m| m.as_str().to_string())
}

/// Find the consignee block: the lines following a "consignee" label, up to
/// a blank line or a competing label. The first captured line is the name;
/// the rest join into the address.
pub fn find_consignee(text: &str) -> Option<(String, Option<String>)> {
    let mut lines = text.lines();
    let mut captured: Vec<String> = Vec::new();
    let mut found_label = false;

    for line in lines.by_ref() {
        if let Some(caps) = CONSIGNEE_LABEL.captures(line) {
            found_label = true;
            let rest = caps[1].trim();
            if !rest.is_empty() {
                captured.push(rest.to_string());
            }
            break;
        }
    }
    if !found_label {
        return None;
    }

    for line in lines {
        let line = line.trim();
        if line.is_empty() || COMPETING_LABEL.is_match(line) {
            break;
        }
        captured.push(line.to_string());
    }

    let mut captured = captured.into_iter();
    let name = captured.next()?;
    let address: Vec<String> = captured.collect();
    let address = if address.is_empty() {
        None
    } else {
        Some(address.join(", "))
    };
    Some((name, address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_of_lading_labels() {
        assert_eq!(
            find_bill_of_lading("Bill of Lading No: ABC12345").as_deref(),
            Some("ABC12345")
        );
        assert_eq!(
            find_bill_of_lading("B/L: cosu534343282").as_deref(),
            Some("COSU534343282")
        );
        assert_eq!(
            find_bill_of_lading("BOL # 123-456789").as_deref(),
            Some("123-456789")
        );
        assert_eq!(find_bill_of_lading("no shipping data here"), None);
    }

    #[test]
    fn test_container_pattern() {
        assert_eq!(
            find_container_number("Container: MSKU1234567 sealed").as_deref(),
            Some("MSKU1234567")
        );
        // Lowercase and wrong digit counts don't match
        assert_eq!(find_container_number("msku1234567"), None);
        assert_eq!(find_container_number("MSKU123456"), None);
    }

    #[test]
    fn test_date_priority_order() {
        // ISO wins even when a US-style date appears first in the text
        assert_eq!(
            find_date("printed 09/05/2024, shipped 2024-09-05").as_deref(),
            Some("2024-09-05")
        );
        assert_eq!(find_date("Date: 09/05/2024").as_deref(), Some("09/05/2024"));
        assert_eq!(find_date("Date: 09-05-2024").as_deref(), Some("09-05-2024"));
        assert_eq!(
            find_date("Issued September 5, 2024").as_deref(),
            Some("September 5, 2024")
        );
        assert_eq!(find_date("undated"), None);
    }

    #[test]
    fn test_consignee_same_line_name() {
        let text = "Consignee: John Doe\n123 Main St, Springfield";
        let (name, address) = find_consignee(text).unwrap();
        assert_eq!(name, "John Doe");
        assert_eq!(address.as_deref(), Some("123 Main St, Springfield"));
    }

    #[test]
    fn test_consignee_block_stops_at_blank_line() {
        let text = "Consignee:\nAcme Retail GmbH\nHafenstrasse 1\n20457 Hamburg\n\nTotal: 3";
        let (name, address) = find_consignee(text).unwrap();
        assert_eq!(name, "Acme Retail GmbH");
        assert_eq!(address.as_deref(), Some("Hafenstrasse 1, 20457 Hamburg"));
    }

    #[test]
    fn test_consignee_block_stops_at_competing_label() {
        let text = "Consignee:\nAcme Retail GmbH\nShipper: Globex Ltd";
        let (name, address) = find_consignee(text).unwrap();
        assert_eq!(name, "Acme Retail GmbH");
        assert_eq!(address, None);
    }

    #[test]
    fn test_consignee_absent() {
        assert_eq!(find_consignee("Shipper: Globex Ltd"), None);
    }

    #[test]
    fn test_consignee_label_with_nothing_after() {
        assert_eq!(find_consignee("Consignee:\n\nShipper: Globex"), None);
    }
}
