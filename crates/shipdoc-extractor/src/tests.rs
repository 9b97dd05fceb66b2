//! Integration tests for the Reconciler

#[cfg(test)]
mod tests {
    use crate::{QueryMode, Reconciler, ReconcilerConfig};
    use shipdoc_domain::{
        CanonicalField, FieldValue, SpreadsheetMetrics, StrategySource,
    };
    use shipdoc_llm::MockBackend;

    const DOCUMENT: &str = "\
Bill of Lading No: ABC12345
Container: MSKU1234567
Consignee: John Doe
123 Main St, Springfield

Date: 2024-09-05";

    fn metrics() -> SpreadsheetMetrics {
        SpreadsheetMetrics {
            line_items_count: Some(3),
            average_gross_weight: Some(50.0),
            average_price: Some(100.0),
        }
    }

    #[tokio::test]
    async fn test_rules_and_spreadsheet_without_llm() {
        let reconciler = Reconciler::new(ReconcilerConfig::default());

        let record = reconciler.reconcile(DOCUMENT, Some(&metrics())).await.unwrap();

        assert_eq!(
            record.value(CanonicalField::BillOfLadingNumber),
            &FieldValue::Text("ABC12345".to_string())
        );
        assert_eq!(
            record.source(CanonicalField::BillOfLadingNumber),
            StrategySource::Rule
        );
        assert_eq!(
            record.value(CanonicalField::ContainerNumber),
            &FieldValue::Text("MSKU1234567".to_string())
        );
        assert_eq!(
            record.value(CanonicalField::ConsigneeName),
            &FieldValue::Text("John Doe".to_string())
        );
        assert_eq!(
            record.source(CanonicalField::ConsigneeName),
            StrategySource::Rule
        );
        let address = record
            .value(CanonicalField::ConsigneeAddress)
            .as_text()
            .unwrap();
        assert!(address.contains("123 Main St"));
        assert_eq!(
            record.value(CanonicalField::Date),
            &FieldValue::Text("2024-09-05".to_string())
        );
        assert_eq!(record.source(CanonicalField::Date), StrategySource::Rule);

        assert_eq!(
            record.value(CanonicalField::LineItemsCount),
            &FieldValue::Integer(3)
        );
        assert_eq!(
            record.source(CanonicalField::LineItemsCount),
            StrategySource::Spreadsheet
        );
        assert_eq!(
            record.value(CanonicalField::AverageGrossWeight),
            &FieldValue::Number(50.0)
        );
        assert_eq!(
            record.value(CanonicalField::AveragePrice),
            &FieldValue::Number(100.0)
        );
        assert_eq!(
            record.source(CanonicalField::AveragePrice),
            StrategySource::Spreadsheet
        );

        assert_eq!(record.llm_provider, None);
    }

    #[tokio::test]
    async fn test_computed_aggregates_override_llm_arithmetic() {
        // The payload's own line_items_count is wrong on purpose; the
        // aggregator's answer must win.
        let backend = MockBackend::new(
            r#"{
                "bill_of_lading_number": "ABC12345",
                "line_items_count": 99,
                "average_gross_weight": 1.0,
                "items": [
                    {"description": "Widgets", "gross_weight": 10.0, "unit_price": 5.0},
                    {"description": "Gadgets", "gross_weight": 20.0, "unit_price": null}
                ]
            }"#,
        );
        let reconciler = Reconciler::new(ReconcilerConfig::default()).with_backend(backend);

        let record = reconciler.reconcile(DOCUMENT, None).await.unwrap();

        assert_eq!(record.items.len(), 2);
        assert_eq!(
            record.value(CanonicalField::LineItemsCount),
            &FieldValue::Integer(2)
        );
        assert_eq!(
            record.source(CanonicalField::LineItemsCount),
            StrategySource::Computed
        );
        assert_eq!(
            record.value(CanonicalField::AverageGrossWeight),
            &FieldValue::Number(15.0)
        );
        assert_eq!(
            record.source(CanonicalField::AverageGrossWeight),
            StrategySource::Computed
        );
        assert_eq!(
            record.value(CanonicalField::AveragePrice),
            &FieldValue::Number(5.0)
        );
        assert_eq!(record.llm_provider.as_deref(), Some("mock"));
    }

    #[tokio::test]
    async fn test_items_suppress_spreadsheet_metrics() {
        let backend = MockBackend::new(
            r#"{"items": [{"gross_weight": 10.0, "unit_price": 5.0}]}"#,
        );
        let reconciler = Reconciler::new(ReconcilerConfig::default()).with_backend(backend);

        let record = reconciler.reconcile(DOCUMENT, Some(&metrics())).await.unwrap();

        // Step 3 never runs when step 1 yielded items
        assert_eq!(
            record.value(CanonicalField::LineItemsCount),
            &FieldValue::Integer(1)
        );
        assert_eq!(
            record.source(CanonicalField::LineItemsCount),
            StrategySource::Computed
        );
    }

    #[tokio::test]
    async fn test_metrics_without_count_are_ignored() {
        let partial = SpreadsheetMetrics {
            line_items_count: None,
            average_gross_weight: Some(50.0),
            average_price: Some(100.0),
        };
        let reconciler = Reconciler::new(ReconcilerConfig::default());

        let record = reconciler.reconcile(DOCUMENT, Some(&partial)).await.unwrap();

        assert!(record.is_unfilled(CanonicalField::AverageGrossWeight));
        assert_eq!(
            record.source(CanonicalField::AverageGrossWeight),
            StrategySource::None
        );
    }

    #[tokio::test]
    async fn test_malformed_payload_carries_nothing_over() {
        // A payload that fails schema validation must not leak its valid
        // members into the record; the rule fallback fills the fields.
        let backend = MockBackend::new(
            r#"{"bill_of_lading_number": "XYZ99999", "items": {"count": 3}}"#,
        );
        let reconciler = Reconciler::new(ReconcilerConfig::default()).with_backend(backend);

        let record = reconciler.reconcile(DOCUMENT, None).await.unwrap();

        assert_eq!(
            record.value(CanonicalField::BillOfLadingNumber),
            &FieldValue::Text("ABC12345".to_string())
        );
        assert_eq!(
            record.source(CanonicalField::BillOfLadingNumber),
            StrategySource::Rule
        );
        assert_eq!(record.llm_provider, None);
    }

    #[tokio::test]
    async fn test_failing_source_falls_through_to_next() {
        let reconciler = Reconciler::new(ReconcilerConfig::default())
            .with_backend(MockBackend::failing().with_name("primary"))
            .with_backend(
                MockBackend::new(r#"{"consignee_name": "Jane Roe"}"#).with_name("secondary"),
            );

        let record = reconciler.reconcile(DOCUMENT, None).await.unwrap();

        assert_eq!(record.llm_provider.as_deref(), Some("secondary"));
        assert_eq!(
            record.value(CanonicalField::ConsigneeName),
            &FieldValue::Text("jane roe".to_string())
        );
        assert_eq!(
            record.source(CanonicalField::ConsigneeName),
            StrategySource::Llm
        );
    }

    #[tokio::test]
    async fn test_unfilled_fields_keep_no_provenance() {
        let reconciler = Reconciler::new(ReconcilerConfig::default());

        let record = reconciler
            .reconcile("nothing extractable here", None)
            .await
            .unwrap();

        for field in CanonicalField::ALL {
            assert!(record.is_unfilled(field));
            assert_eq!(record.source(field), StrategySource::None);
        }
    }

    #[tokio::test]
    async fn test_empty_document_is_rejected() {
        let reconciler = Reconciler::new(ReconcilerConfig::default());
        assert!(reconciler.reconcile("   \n  ", None).await.is_err());
    }

    #[tokio::test]
    async fn test_oversized_document_is_rejected() {
        let mut config = ReconcilerConfig::default();
        config.max_text_length = 100;
        let reconciler = Reconciler::new(config);

        let text = "a".repeat(200);
        assert!(reconciler.reconcile(&text, None).await.is_err());
    }

    #[tokio::test]
    async fn test_per_field_mode_through_reconciler() {
        let mut config = ReconcilerConfig::default();
        config.query_mode = QueryMode::PerField;

        let backend = MockBackend::new("<result>ABC12345</result>");
        let reconciler = Reconciler::new(config).with_backend(backend);

        let record = reconciler.reconcile(DOCUMENT, None).await.unwrap();

        assert_eq!(record.llm_provider.as_deref(), Some("mock"));
        assert_eq!(
            record.source(CanonicalField::BillOfLadingNumber),
            StrategySource::Llm
        );
    }

    #[tokio::test]
    async fn test_llm_fields_win_over_rules() {
        let backend = MockBackend::new(r#"{"bill_of_lading_number": "LLM11111"}"#);
        let reconciler = Reconciler::new(ReconcilerConfig::default()).with_backend(backend);

        let record = reconciler.reconcile(DOCUMENT, None).await.unwrap();

        // The rule fallback only fills fields the primary strategy left null
        assert_eq!(
            record.value(CanonicalField::BillOfLadingNumber),
            &FieldValue::Text("LLM11111".to_string())
        );
        assert_eq!(
            record.source(CanonicalField::BillOfLadingNumber),
            StrategySource::Llm
        );
        // Container was not in the payload, so the rule found it
        assert_eq!(
            record.source(CanonicalField::ContainerNumber),
            StrategySource::Rule
        );
    }

    #[tokio::test]
    async fn test_config_presets() {
        let default = ReconcilerConfig::default();
        assert_eq!(default.max_text_length, 50_000);
        assert_eq!(default.llm_timeout_secs, 30);

        let aggressive = ReconcilerConfig::aggressive();
        assert_eq!(aggressive.max_text_length, 20_000);
        assert_eq!(aggressive.llm_timeout_secs, 15);

        let lenient = ReconcilerConfig::lenient();
        assert_eq!(lenient.max_text_length, 100_000);
        assert_eq!(lenient.llm_timeout_secs, 120);
    }
}
