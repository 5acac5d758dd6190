//! Batch processing command for multiple text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use poex_core::{ExtractionOutcome, PoParser};

use super::extract::{format_outcome, OutputFormat};
use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Option<ExtractionOutcome>,
    error: Option<String>,
    processing_time_ms: u64,
}

impl ProcessResult {
    fn succeeded(&self) -> bool {
        self.outcome.as_ref().is_some_and(|o| !o.is_error())
    }

    fn error_message(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.clone());
        }
        self.outcome
            .as_ref()
            .filter(|o| o.is_error())
            .map(|o| o.diagnostics.errors.join("; "))
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // The parser is immutable; workers share it.
    let parser = Arc::new(PoParser::new().with_config(config));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let parser = Arc::clone(&parser);
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let pb = overall_pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let result = process_single_file(path, &parser);
            pb.inc(1);
            drop(permit);
            result
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await?;

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                overall_pb.abandon();
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        results.push(result);
    }

    overall_pb.finish_and_clear();

    // Write outputs
    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            let Some(outcome) = &result.outcome else {
                continue;
            };

            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("order");
            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            fs::write(&output_path, format_outcome(outcome, args.format, false)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<&ProcessResult> = results.iter().filter(|r| !r.succeeded()).collect();

    // Print summary
    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error_message().unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }

    Ok(())
}

fn process_single_file(path: PathBuf, parser: &PoParser) -> ProcessResult {
    let file_start = Instant::now();

    let (outcome, error) = match fs::read_to_string(&path) {
        Ok(text) => (Some(parser.parse(&text)), None),
        Err(e) => (None, Some(e.to_string())),
    };

    ProcessResult {
        path,
        outcome,
        error,
        processing_time_ms: file_start.elapsed().as_millis() as u64,
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "format_type",
        "po_number",
        "customer_name",
        "total_amount",
        "currency",
        "product_count",
        "confidence",
        "completeness",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let error = result.error_message().unwrap_or_default();

        if let Some(outcome) = &result.outcome {
            let record = &outcome.result;
            wtr.write_record([
                filename,
                if result.succeeded() { "success" } else { "error" },
                record.format_type.as_str(),
                &record.po_number,
                &record.customer_name,
                &record.total_amount,
                &record.currency,
                &record.products.len().to_string(),
                &format!("{:.2}", record.extraction_confidence),
                &format!("{:.2}", outcome.quality.completeness),
                &result.processing_time_ms.to_string(),
                &error,
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                &error,
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
