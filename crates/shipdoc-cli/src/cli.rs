//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shipdoc CLI - Extract shipment fields from document text and score
/// extraction accuracy against ground truth.
#[derive(Debug, Parser)]
#[command(name = "shipdoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract shipment fields from document text
    Extract(ExtractArgs),

    /// Score one extraction against ground truth
    Score(ScoreArgs),

    /// Score a directory of evaluation cases and aggregate the results
    Batch(BatchArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Text file to extract from
    pub file: Option<PathBuf>,

    /// Read document text from stdin
    #[arg(long)]
    pub stdin: bool,

    /// JSON file with spreadsheet-derived metrics
    /// (line_items_count, average_gross_weight, average_price)
    #[arg(short, long)]
    pub metrics: Option<PathBuf>,

    /// Anthropic API key; enables the primary LLM strategy
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model for the primary LLM strategy
    #[arg(long)]
    pub model: Option<String>,

    /// Issue one sub-query per field instead of one combined request
    #[arg(long)]
    pub per_field: bool,
}

/// Arguments for the score command.
#[derive(Debug, Parser)]
pub struct ScoreArgs {
    /// JSON file with the extracted field map
    pub extracted: PathBuf,

    /// JSON file with the ground-truth field map
    pub ground_truth: PathBuf,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// Directory containing eval_* case directories, each with
    /// ground_truth.json and predictions.json
    pub dir: PathBuf,

    /// Write the aggregate report to this JSON file
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from(["shipdoc", "extract", "doc.txt", "--metrics", "m.json"]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.file.unwrap().to_str(), Some("doc.txt"));
                assert_eq!(args.metrics.unwrap().to_str(), Some("m.json"));
                assert!(!args.per_field);
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_score_command() {
        let cli = Cli::parse_from(["shipdoc", "score", "extracted.json", "truth.json"]);
        match cli.command {
            Command::Score(args) => {
                assert_eq!(args.extracted.to_str(), Some("extracted.json"));
                assert_eq!(args.ground_truth.to_str(), Some("truth.json"));
            }
            _ => panic!("Expected Score command"),
        }
    }

    #[test]
    fn test_batch_command_with_format() {
        let cli = Cli::parse_from(["shipdoc", "batch", "eval", "--format", "json"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        match cli.command {
            Command::Batch(args) => assert_eq!(args.dir.to_str(), Some("eval")),
            _ => panic!("Expected Batch command"),
        }
    }
}
