//! Batch command implementation.
//!
//! Discovers `eval_*` case directories, scores each case's predictions
//! against its ground truth, and aggregates the per-case reports into a
//! corpus summary.

use crate::cli::BatchArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::input;
use crate::output::Formatter;
use shipdoc_domain::AccuracyReport;
use shipdoc_scorer::{score_batch, DocumentScorer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One discovered evaluation case.
#[derive(Debug)]
pub struct EvalCase {
    /// Directory name, used as the case label
    pub name: String,
    /// Path to ground_truth.json
    pub ground_truth_path: PathBuf,
    /// Path to predictions.json
    pub predictions_path: PathBuf,
}

/// Execute the batch command.
pub fn execute_batch(args: BatchArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let cases = discover_cases(&args.dir)?;
    if cases.is_empty() {
        return Err(CliError::InvalidInput(format!(
            "no eval_* cases found under {}",
            args.dir.display()
        )));
    }

    let scorer = DocumentScorer::new(config.scoring.clone());
    let scored = run_cases(&cases, &scorer);
    let reports: Vec<AccuracyReport> = scored.iter().map(|(_, report)| report.clone()).collect();
    let batch = score_batch(&reports);

    println!("{}", formatter.format_batch(&scored, &batch)?);

    if let Some(out) = &args.out {
        let report = serde_json::json!({
            "summary": batch,
            "cases": scored
                .iter()
                .map(|(name, report)| serde_json::json!({
                    "case": name,
                    "report": report,
                }))
                .collect::<Vec<_>>(),
        });
        fs::write(out, serde_json::to_string_pretty(&report)?)?;
        eprintln!("{}", formatter.info(&format!("Wrote {}", out.display())));
    }

    Ok(())
}

/// Discover `eval_*` case directories under a base directory, sorted by
/// name. Directories missing either JSON file are skipped with a warning.
pub fn discover_cases(base: &Path) -> Result<Vec<EvalCase>> {
    let mut cases = Vec::new();

    for entry in fs::read_dir(base)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with("eval_") {
            continue;
        }

        let ground_truth_path = path.join("ground_truth.json");
        if !ground_truth_path.exists() {
            warn!("skipping {}: missing ground_truth.json", name);
            continue;
        }
        let predictions_path = path.join("predictions.json");
        if !predictions_path.exists() {
            warn!("skipping {}: missing predictions.json", name);
            continue;
        }

        cases.push(EvalCase {
            name: name.to_string(),
            ground_truth_path,
            predictions_path,
        });
    }

    cases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cases)
}

/// Score every case. A case whose files cannot be read or parsed is
/// dropped with a warning rather than failing the whole batch.
pub fn run_cases(cases: &[EvalCase], scorer: &DocumentScorer) -> Vec<(String, AccuracyReport)> {
    let mut scored = Vec::new();

    for case in cases {
        let maps = input::read_field_map(&case.predictions_path).and_then(|predictions| {
            input::read_field_map(&case.ground_truth_path)
                .map(|ground_truth| (predictions, ground_truth))
        });

        match maps {
            Ok((predictions, ground_truth)) => {
                scored.push((case.name.clone(), scorer.score(&predictions, &ground_truth)));
            }
            Err(e) => warn!("skipping {}: {}", case.name, e),
        }
    }

    scored
}
