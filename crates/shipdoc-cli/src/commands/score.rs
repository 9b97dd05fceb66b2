//! Score command implementation.

use crate::cli::ScoreArgs;
use crate::config::Config;
use crate::error::Result;
use crate::input;
use crate::output::Formatter;
use shipdoc_scorer::DocumentScorer;

/// Execute the score command.
pub fn execute_score(args: ScoreArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let extracted = input::read_field_map(&args.extracted)?;
    let ground_truth = input::read_field_map(&args.ground_truth)?;

    let scorer = DocumentScorer::new(config.scoring.clone());
    let report = scorer.score(&extracted, &ground_truth);

    println!("{}", formatter.format_report(&report)?);

    Ok(())
}
