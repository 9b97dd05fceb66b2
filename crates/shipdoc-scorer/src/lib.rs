//! Shipdoc Scorer
//!
//! Scores extracted shipment data against ground truth.
//!
//! # Overview
//!
//! Comparison is field-type-aware: identifiers tolerate punctuation noise,
//! dates are compared semantically rather than textually, and free text uses
//! a sequence-similarity ratio with a noise floor so coincidental substring
//! overlap is not rewarded.
//!
//! # Architecture
//!
//! ```text
//! (extracted, ground truth) → DocumentScorer → AccuracyReport
//! [AccuracyReport, ...] → score_batch → BatchAccuracyReport
//! ```
//!
//! # Example Usage
//!
//! ```
//! use shipdoc_scorer::{DocumentScorer, ScoringConfig};
//! use shipdoc_domain::FieldValue;
//! use std::collections::BTreeMap;
//!
//! let scorer = DocumentScorer::new(ScoringConfig::default());
//!
//! let mut extracted = BTreeMap::new();
//! extracted.insert("bill_of_lading_number".to_string(), FieldValue::from("BOL-123-456"));
//! let mut truth = BTreeMap::new();
//! truth.insert("bill_of_lading_number".to_string(), FieldValue::from("BOL123456"));
//!
//! let report = scorer.score(&extracted, &truth);
//! assert_eq!(report.overall_accuracy, 1.0);
//! ```

#![warn(missing_docs)]

mod batch;
mod config;
mod document;
mod similarity;

pub use batch::score_batch;
pub use config::ScoringConfig;
pub use document::DocumentScorer;
pub use similarity::{field_similarity, sequence_ratio, FieldKind};
