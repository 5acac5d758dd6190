//! Validate command - clean and score a draft record given as JSON.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;

use poex_core::order::score;
use poex_core::{DraftRecord, ExtractionResult, QualityReport};

use super::{load_config, read_input};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Draft record as JSON (`-` for stdin); legacy camelCase keys are accepted
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include the quality report in the output
    #[arg(long)]
    report: bool,
}

#[derive(Serialize)]
struct ValidatedDraft<'a> {
    result: &'a ExtractionResult,
    quality: &'a QualityReport,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let content = read_input(&args.input)?;

    let draft: DraftRecord = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid draft record: {}", e))?;

    let mut result = poex_core::validate(&draft, &config.validation);
    let quality = score(&result, &config);
    result.extraction_confidence = quality.confidence;

    let output = if args.report {
        serde_json::to_string_pretty(&ValidatedDraft {
            result: &result,
            quality: &quality,
        })?
    } else {
        serde_json::to_string_pretty(&result)?
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if !quality.suggestions.is_empty() {
        eprintln!("{}", style("Suggestions:").yellow());
        for suggestion in &quality.suggestions {
            eprintln!("  - {}", suggestion);
        }
    }

    Ok(())
}
