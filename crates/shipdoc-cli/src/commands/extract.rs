//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use shipdoc_domain::SpreadsheetMetrics;
use shipdoc_extractor::{QueryMode, Reconciler};
use shipdoc_llm::AnthropicBackend;
use std::fs;
use std::io::{self, Read};

/// Execute the extract command.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let text = read_text(&args)?;
    let metrics = read_metrics(&args)?;

    let mut reconciler_config = config.reconciler.clone();
    if args.per_field {
        reconciler_config.query_mode = QueryMode::PerField;
    }

    let mut reconciler = Reconciler::new(reconciler_config);
    if let Some(api_key) = &args.api_key {
        let backend = match &args.model {
            Some(model) => AnthropicBackend::new(api_key, model),
            None => AnthropicBackend::default_model(api_key),
        };
        reconciler = reconciler.with_backend(backend);
    }

    let record = reconciler.reconcile(&text, metrics.as_ref()).await?;

    println!("{}", formatter.format_record(&record)?);

    Ok(())
}

/// Read document text from the file argument or stdin.
fn read_text(args: &ExtractArgs) -> Result<String> {
    if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(file_path) = &args.file {
        Ok(fs::read_to_string(file_path)?)
    } else {
        Err(CliError::InvalidInput(
            "Must specify either a text file or --stdin".to_string(),
        ))
    }
}

fn read_metrics(args: &ExtractArgs) -> Result<Option<SpreadsheetMetrics>> {
    let Some(path) = &args.metrics else {
        return Ok(None);
    };
    let contents = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&contents)?))
}
