//! LLM prompt engineering for shipment field extraction

use shipdoc_domain::CanonicalField;

/// JSON schema handed to backends that support structured output.
pub const PAYLOAD_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "bill_of_lading_number": {"type": ["string", "null"]},
    "container_number": {"type": ["string", "null"]},
    "consignee_name": {"type": ["string", "null"]},
    "consignee_address": {"type": ["string", "null"]},
    "date": {"type": ["string", "null"]},
    "items": {
      "type": "array",
      "items": {
        "type": "object",
        "properties": {
          "description": {"type": ["string", "null"]},
          "quantity": {"type": ["number", "null"]},
          "gross_weight": {"type": ["number", "null"]},
          "unit_price": {"type": ["number", "null"]}
        }
      }
    }
  }
}"#;

const COMBINED_INSTRUCTIONS: &str = r#"Extract shipment data from the following document text.

Return a single JSON object with these keys:
- "bill_of_lading_number": the bill of lading number (look for "bill of lading", "B/L", or "BOL" labels)
- "container_number": the container number (4 letters followed by 7 digits, e.g. "MSKU1234567")
- "consignee_name": the name of the party receiving the goods
- "consignee_address": the consignee's address
- "date": the issue or shipment date, in YYYY-MM-DD format when possible
- "items": an array of line items, each with "description", "quantity", "gross_weight", and "unit_price"

Rules:
- Use null for any field you cannot find; never invent values
- Copy identifiers exactly as they appear, including hyphens
- Include every line item from invoices and packing lists, in document order
- Numeric members must be plain numbers without units or currency symbols"#;

const OUTPUT_FORMAT_REMINDER: &str =
    "Return ONLY the JSON object, no markdown code blocks, no explanations.";

/// Build the combined structured-extraction prompt.
pub fn combined_prompt(text: &str, text_limit: usize) -> String {
    let mut prompt = String::new();

    prompt.push_str(COMBINED_INSTRUCTIONS);
    prompt.push_str("\n\nDocument text:\n---\n");
    prompt.push_str(&truncate(text, text_limit));
    prompt.push_str("\n---\n\n");
    prompt.push_str(OUTPUT_FORMAT_REMINDER);

    prompt
}

/// Build a single-field extraction prompt for the per-field query mode.
///
/// Responses carry the answer in a `<result>` tag so that the value can be
/// separated from any explanation the model adds.
pub fn field_prompt(field: CanonicalField, text: &str, text_limit: usize) -> String {
    format!(
        "You are tasked with extracting the {label} from a document.\n\n\
         <document>\n{text}\n</document>\n\n\
         {hint}\n\n\
         Present your findings as:\n\
         <result>\n[the {label} you found, or \"Not found\"]\n</result>\n\n\
         Extract only the {label}; do not include any other information.",
        label = field_label(field),
        text = truncate(text, text_limit),
        hint = field_hint(field),
    )
}

fn field_label(field: CanonicalField) -> &'static str {
    match field {
        CanonicalField::BillOfLadingNumber => "bill of lading number",
        CanonicalField::ContainerNumber => "container number",
        CanonicalField::ConsigneeName => "consignee name",
        CanonicalField::ConsigneeAddress => "consignee address",
        CanonicalField::Date => "date",
        CanonicalField::LineItemsCount => "line items count",
        CanonicalField::AverageGrossWeight => "average gross weight",
        CanonicalField::AveragePrice => "average price",
    }
}

fn field_hint(field: CanonicalField) -> &'static str {
    match field {
        CanonicalField::BillOfLadingNumber => {
            "Look for \"bill of lading\", \"B/L\", or \"BOL\" followed by a number. \
             Typical formats are \"ABCD1234567\" or \"123-456789\"."
        }
        CanonicalField::ContainerNumber => {
            "A container number is 4 letters (the owner code) followed by 7 digits, \
             e.g. \"MSKU1234567\". Prefer matches near words like \"container\" or \"cargo\"."
        }
        CanonicalField::ConsigneeName => {
            "Look for labels such as \"Consignee:\", \"Ship To:\", or \"Deliver To:\". \
             Extract only the name, not the address."
        }
        CanonicalField::ConsigneeAddress => {
            "Look for the address lines following a \"Consignee:\" label, excluding \
             the consignee's name itself."
        }
        CanonicalField::Date => {
            "Prefer the issue or shipment date over other dates. Convert the date \
             to YYYY-MM-DD format."
        }
        CanonicalField::LineItemsCount => {
            "Only extract an explicitly stated count such as \"Number of Items:\" or \
             \"Total Items:\"; do not calculate it yourself."
        }
        CanonicalField::AverageGrossWeight => {
            "Look for \"Average Gross Weight\" or \"Avg. Gross Weight\" and extract \
             the numeric value."
        }
        CanonicalField::AveragePrice => {
            "Look for \"average price\", \"avg price\", or \"mean price\" and extract \
             the numeric value."
        }
    }
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_prompt_includes_text_and_schema_keys() {
        let prompt = combined_prompt("Bill of Lading No: ABC12345", 3_000);
        assert!(prompt.contains("Bill of Lading No: ABC12345"));
        assert!(prompt.contains("\"bill_of_lading_number\""));
        assert!(prompt.contains("\"items\""));
        assert!(prompt.contains("ONLY the JSON object"));
    }

    #[test]
    fn test_combined_prompt_truncates_document() {
        let text = "x".repeat(10_000);
        let prompt = combined_prompt(&text, 3_000);
        assert!(prompt.len() < 4_000);
    }

    #[test]
    fn test_field_prompt_mentions_field() {
        let prompt = field_prompt(CanonicalField::ContainerNumber, "some text", 3_000);
        assert!(prompt.contains("container number"));
        assert!(prompt.contains("some text"));
        assert!(prompt.contains("<result>"));
    }

    #[test]
    fn test_field_prompts_are_distinct() {
        let a = field_prompt(CanonicalField::Date, "doc", 3_000);
        let b = field_prompt(CanonicalField::ConsigneeName, "doc", 3_000);
        assert_ne!(a, b);
    }
}
