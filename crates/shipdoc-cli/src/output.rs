//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use shipdoc_domain::{AccuracyReport, BatchAccuracyReport, CanonicalField, ExtractionRecord};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an extraction record.
    pub fn format_record(&self, record: &ExtractionRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_record_json(record),
            OutputFormat::Table => self.format_record_table(record),
        }
    }

    fn format_record_json(&self, record: &ExtractionRecord) -> Result<String> {
        let json = serde_json::json!({
            "fields": record.field_map(),
            "provenance": record.provenance_map(),
            "items": record.items,
            "llm_provider": record.llm_provider,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }

    fn format_record_table(&self, record: &ExtractionRecord) -> Result<String> {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value", "Source"]);

        for field in CanonicalField::ALL {
            let value = record.value(field).to_string();
            let source = record.source(field).to_string();
            builder.push_record([field.as_str(), &value, &source]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut out = table.to_string();
        out.push('\n');
        out.push_str(&match &record.llm_provider {
            Some(provider) => self.info(&format!(
                "{} line item(s); primary payload from '{}'",
                record.items.len(),
                provider
            )),
            None => self.info(&format!(
                "{} line item(s); no primary payload",
                record.items.len()
            )),
        });
        Ok(out)
    }

    /// Format a per-document accuracy report.
    pub fn format_report(&self, report: &AccuracyReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_report_text(report)),
        }
    }

    fn format_report_text(&self, report: &AccuracyReport) -> String {
        let mut out = format!(
            "Overall Accuracy: {}\nPerfect Matches: {}/{}\n\nField-by-field Breakdown:\n",
            percent(report.overall_accuracy),
            report.perfect_matches,
            report.total_fields
        );
        for (field, accuracy) in &report.field_accuracies {
            out.push_str(&format!(
                "  {} {}: {}\n",
                self.status_mark(*accuracy),
                field,
                percent(*accuracy)
            ));
        }
        out
    }

    /// Format a batch report with its per-case results.
    pub fn format_batch(
        &self,
        cases: &[(String, AccuracyReport)],
        batch: &BatchAccuracyReport,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "summary": batch,
                    "cases": cases
                        .iter()
                        .map(|(name, report)| serde_json::json!({
                            "case": name,
                            "report": report,
                        }))
                        .collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&json)?)
            }
            OutputFormat::Table => self.format_batch_table(cases, batch),
        }
    }

    fn format_batch_table(
        &self,
        cases: &[(String, AccuracyReport)],
        batch: &BatchAccuracyReport,
    ) -> Result<String> {
        let mut builder = Builder::default();
        builder.push_record(["Case", "Accuracy", "Perfect", "Fields"]);

        for (name, report) in cases {
            builder.push_record([
                name.as_str(),
                &percent(report.overall_accuracy),
                &report.perfect_matches.to_string(),
                &report.total_fields.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut out = table.to_string();
        out.push_str(&format!(
            "\nBatch Accuracy: {} ({} document(s), {} perfect)\n",
            percent(batch.batch_accuracy),
            batch.total_documents,
            batch.documents_with_perfect_score
        ));

        if !batch.field_breakdown.is_empty() {
            out.push_str("\nField Breakdown:\n");
            for (field, accuracy) in &batch.field_breakdown {
                out.push_str(&format!(
                    "  {} {}: {}\n",
                    self.status_mark(*accuracy),
                    field,
                    percent(*accuracy)
                ));
            }
        }
        Ok(out)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Status mark for a field accuracy: perfect, partial, or wrong.
    fn status_mark(&self, accuracy: f64) -> String {
        if accuracy == 1.0 {
            self.colorize("✓", "green")
        } else if accuracy == 0.0 {
            self.colorize("✗", "red")
        } else {
            self.colorize("~", "yellow")
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}
