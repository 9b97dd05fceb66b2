//! Extraction reconciliation
//!
//! Merges candidate field values from the primary structured sources, the
//! line-item aggregator, spreadsheet metrics, and the rule-based fallback
//! into one extraction record, stamping per-field provenance.

use crate::config::ReconcilerConfig;
use crate::error::ExtractorError;
use crate::items::aggregate_items;
use crate::rules;
use crate::source::{LlmSource, PayloadSource};
use crate::types::DocumentPayload;
use shipdoc_domain::traits::LlmBackend;
use shipdoc_domain::{CanonicalField, ExtractionRecord, SpreadsheetMetrics, StrategySource};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Produces one ExtractionRecord per document from raw text plus optional
/// spreadsheet metrics.
///
/// Strategies run in a strict priority order and each is independently
/// fault-tolerant: a failing step degrades to the next one, and the only
/// errors that escape are for truly invalid input.
pub struct Reconciler {
    sources: Vec<Arc<dyn PayloadSource>>,
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Create a reconciler with no primary sources configured.
    ///
    /// Without sources, extraction relies on spreadsheet metrics and the
    /// rule-based fallback alone.
    pub fn new(config: ReconcilerConfig) -> Self {
        Self {
            sources: Vec::new(),
            config,
        }
    }

    /// Append a primary source; sources are tried in insertion order.
    pub fn with_source(mut self, source: impl PayloadSource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Append an LLM backend, adapted into a payload source using this
    /// reconciler's query mode and prompt limit.
    pub fn with_backend<B>(self, backend: B) -> Self
    where
        B: LlmBackend + Send + Sync + 'static,
    {
        let source = LlmSource::new(backend)
            .with_mode(self.config.query_mode)
            .with_prompt_limit(self.config.prompt_text_limit);
        self.with_source(source)
    }

    /// Number of configured primary sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Reconcile one document.
    ///
    /// # Errors
    ///
    /// Only for invalid input: empty text or text beyond the configured
    /// maximum. Strategy failures never surface here.
    pub async fn reconcile(
        &self,
        raw_text: &str,
        metrics: Option<&SpreadsheetMetrics>,
    ) -> Result<ExtractionRecord, ExtractorError> {
        if raw_text.trim().is_empty() {
            return Err(ExtractorError::EmptyDocument);
        }
        if raw_text.len() > self.config.max_text_length {
            return Err(ExtractorError::TextTooLong(
                raw_text.len(),
                self.config.max_text_length,
            ));
        }

        info!(
            "Starting reconciliation: {} chars, {} primary sources, metrics: {}",
            raw_text.len(),
            self.sources.len(),
            metrics.is_some()
        );

        let mut record = ExtractionRecord::empty();

        // Step 1: primary structured sources, in priority order
        if let Some(payload) = self.try_primary_sources(raw_text, &mut record).await {
            for (field, value) in payload.fields {
                record.set(field, value, StrategySource::Llm);
            }
            record.items = payload.items;
        }

        // Step 2: aggregates computed from per-item data always win over
        // the primary extractor's own arithmetic
        if !record.items.is_empty() {
            let aggregates = aggregate_items(&record.items);
            debug!(
                "Aggregated {} items: avg weight {:?}, avg price {:?}",
                aggregates.count, aggregates.average_gross_weight, aggregates.average_price
            );
            record.set(
                CanonicalField::LineItemsCount,
                aggregates.count as i64,
                StrategySource::Computed,
            );
            if let Some(weight) = aggregates.average_gross_weight {
                record.set(
                    CanonicalField::AverageGrossWeight,
                    weight,
                    StrategySource::Computed,
                );
            }
            if let Some(price) = aggregates.average_price {
                record.set(CanonicalField::AveragePrice, price, StrategySource::Computed);
            }
        } else if let Some(metrics) = metrics {
            // Step 3: spreadsheet metrics, only meaningful with a count
            if metrics.line_items_count.is_some() {
                self.apply_metrics(metrics, &mut record);
            }
        }

        // Step 4: rule-based fallback for text fields still null
        self.apply_rules(raw_text, &mut record);

        info!(
            "Reconciliation complete: {} fields filled, provider: {:?}",
            record
                .fields
                .values()
                .filter(|slot| !slot.is_unfilled())
                .count(),
            record.llm_provider
        );

        Ok(record)
    }

    /// Try each primary source in order; the first valid payload wins and
    /// its source name becomes the record's `llm_provider`. Every failure
    /// mode (timeout, transport error, malformed payload) falls through to
    /// the next source.
    async fn try_primary_sources(
        &self,
        text: &str,
        record: &mut ExtractionRecord,
    ) -> Option<DocumentPayload> {
        for source in &self.sources {
            let name = source.name().to_string();
            let source = Arc::clone(source);
            let text = text.to_string();

            let attempt =
                tokio::task::spawn_blocking(move || source.attempt(&text));

            match timeout(self.config.llm_timeout(), attempt).await {
                Err(_) => warn!("source '{}' timed out", name),
                Ok(Err(e)) => warn!("source '{}' task failed: {}", name, e),
                Ok(Ok(Err(e))) => warn!("source '{}' failed: {}", name, e),
                Ok(Ok(Ok(payload))) => {
                    info!(
                        "source '{}' produced a payload: {} fields, {} items",
                        name,
                        payload.fields.len(),
                        payload.items.len()
                    );
                    record.llm_provider = Some(name);
                    return Some(payload);
                }
            }
        }
        None
    }

    /// Adopt the spreadsheet trio. Null metric members leave whatever an
    /// earlier step produced untouched.
    fn apply_metrics(&self, metrics: &SpreadsheetMetrics, record: &mut ExtractionRecord) {
        if let Some(count) = metrics.line_items_count {
            record.set(
                CanonicalField::LineItemsCount,
                count,
                StrategySource::Spreadsheet,
            );
        }
        if let Some(weight) = metrics.average_gross_weight {
            record.set(
                CanonicalField::AverageGrossWeight,
                weight,
                StrategySource::Spreadsheet,
            );
        }
        if let Some(price) = metrics.average_price {
            record.set(
                CanonicalField::AveragePrice,
                price,
                StrategySource::Spreadsheet,
            );
        }
    }

    fn apply_rules(&self, text: &str, record: &mut ExtractionRecord) {
        if record.is_unfilled(CanonicalField::BillOfLadingNumber) {
            if let Some(value) = rules::find_bill_of_lading(text) {
                debug!("rule fallback found bill of lading number");
                record.set(CanonicalField::BillOfLadingNumber, value, StrategySource::Rule);
            }
        }
        if record.is_unfilled(CanonicalField::ContainerNumber) {
            if let Some(value) = rules::find_container_number(text) {
                debug!("rule fallback found container number");
                record.set(CanonicalField::ContainerNumber, value, StrategySource::Rule);
            }
        }
        if record.is_unfilled(CanonicalField::Date) {
            if let Some(value) = rules::find_date(text) {
                debug!("rule fallback found date");
                record.set(CanonicalField::Date, value, StrategySource::Rule);
            }
        }
        if record.is_unfilled(CanonicalField::ConsigneeName)
            || record.is_unfilled(CanonicalField::ConsigneeAddress)
        {
            if let Some((name, address)) = rules::find_consignee(text) {
                if record.is_unfilled(CanonicalField::ConsigneeName) {
                    debug!("rule fallback found consignee name");
                    record.set(CanonicalField::ConsigneeName, name, StrategySource::Rule);
                }
                if record.is_unfilled(CanonicalField::ConsigneeAddress) {
                    if let Some(address) = address {
                        debug!("rule fallback found consignee address");
                        record.set(
                            CanonicalField::ConsigneeAddress,
                            address,
                            StrategySource::Rule,
                        );
                    }
                }
            }
        }
    }
}
