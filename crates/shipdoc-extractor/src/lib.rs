//! Shipdoc Extractor
//!
//! Reconciles shipment field extractions from multiple strategies into one
//! record with per-field provenance.
//!
//! # Overview
//!
//! The Extractor is the pathway from raw document text to a structured
//! extraction record. Candidate values come from a primary structured
//! extractor (an LLM backend), pre-computed spreadsheet metrics, and a
//! regex/heuristic fallback; the reconciler merges them in a strict
//! priority order and records which strategy supplied each field.
//!
//! # Architecture
//!
//! ```text
//! Text (+ metrics) → Reconciler → PayloadSource chain → Aggregator → ExtractionRecord
//! ```
//!
//! # Key Features
//!
//! - **Strategy Fallback**: primary sources tried in order, each failure
//!   degrades to the next strategy instead of aborting
//! - **Provenance Tracking**: every field value carries its source tag
//! - **Item Aggregation**: counts and averages computed from per-item data
//!   always override an extractor's own arithmetic
//! - **Normalization**: alias key spellings and messy raw values coerced
//!   to the canonical field set
//!
//! # Example Usage
//!
//! ```no_run
//! use shipdoc_extractor::{Reconciler, ReconcilerConfig};
//! use shipdoc_llm::MockBackend;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = MockBackend::new(r#"{"bill_of_lading_number": "ABC12345", "items": []}"#);
//! let reconciler = Reconciler::new(ReconcilerConfig::default()).with_backend(backend);
//!
//! let record = reconciler
//!     .reconcile("Bill of Lading No: ABC12345", None)
//!     .await?;
//!
//! println!("provider: {:?}", record.llm_provider);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod normalize;
mod prompt;
mod rules;
mod items;
mod parser;
mod source;
mod reconciler;

#[cfg(test)]
mod tests;

pub use error::ExtractorError;
pub use config::{QueryMode, ReconcilerConfig};
pub use types::DocumentPayload;
pub use normalize::{canonical_key, normalize_key, normalize_value};
pub use items::{aggregate_items, ItemAggregates};
pub use parser::{parse_field_response, parse_payload};
pub use source::{LlmSource, PayloadSource};
pub use reconciler::Reconciler;
