//! Extract command - extract a purchase order from a single text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use poex_core::{ExtractionOutcome, PoParser};

use super::{load_config, read_input};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file (`-` for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Emit classification, quality report and diagnostics with the record
    #[arg(long)]
    full: bool,

    /// Show extraction confidence and review suggestions
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per product line
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());
    let text = read_input(&args.input)?;

    let parser = PoParser::new().with_config(config);
    let outcome = parser.parse(&text);

    let output = format_outcome(&outcome, args.format, args.full)?;

    // Write output
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

    for error in &outcome.diagnostics.errors {
        eprintln!("{} {}", style("✗").red(), error);
    }

    if args.show_confidence {
        print_confidence(&outcome);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn print_confidence(outcome: &ExtractionOutcome) {
    eprintln!();
    eprintln!(
        "{} Format: {} ({})",
        style("ℹ").blue(),
        outcome.result.format_type,
        outcome.result.format_type.label()
    );
    eprintln!(
        "{} Extraction confidence: {:.1}%",
        style("ℹ").blue(),
        outcome.result.extraction_confidence * 100.0
    );
    eprintln!(
        "{} Completeness: {:.1}%",
        style("ℹ").blue(),
        outcome.quality.completeness * 100.0
    );

    if outcome.diagnostics.fallback_used {
        eprintln!("{} Generic patterns were used as a fallback", style("!").yellow());
    }

    if !outcome.quality.suggestions.is_empty() {
        eprintln!("{}", style("Suggestions:").yellow());
        for suggestion in &outcome.quality.suggestions {
            eprintln!("  - {}", suggestion);
        }
    }
}

pub fn format_outcome(
    outcome: &ExtractionOutcome,
    format: OutputFormat,
    full: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if full => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&outcome.result)?),
        OutputFormat::Csv => format_csv(outcome),
        OutputFormat::Text => Ok(format_text(outcome)),
    }
}

fn format_csv(outcome: &ExtractionOutcome) -> anyhow::Result<String> {
    let result = &outcome.result;
    let mut wtr = csv::Writer::from_writer(vec![]);

    // Write header
    wtr.write_record([
        "po_number",
        "customer_name",
        "currency",
        "payment_terms",
        "shipping_terms",
        "destination",
        "total_amount",
        "product_name",
        "quantity",
        "unit_price",
        "subtotal",
    ])?;

    // One row per product line
    for product in &result.products {
        wtr.write_record([
            &result.po_number,
            &result.customer_name,
            &result.currency,
            &result.payment_terms,
            &result.shipping_terms,
            &result.destination,
            &result.total_amount,
            &product.name,
            &product.quantity,
            &product.unit_price,
            &product.subtotal,
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(outcome: &ExtractionOutcome) -> String {
    let result = &outcome.result;
    let mut output = String::new();

    output.push_str(&format!("Purchase Order: {}\n", result.po_number));
    output.push_str(&format!(
        "Format: {} ({})\n",
        result.format_type,
        result.format_type.label()
    ));
    output.push('\n');

    output.push_str(&format!("Customer: {}\n", result.customer_name));
    if !result.destination.is_empty() {
        output.push_str(&format!("Destination: {}\n", result.destination));
    }
    if !result.payment_terms.is_empty() {
        output.push_str(&format!("Payment terms: {}\n", result.payment_terms));
    }
    if !result.shipping_terms.is_empty() {
        output.push_str(&format!("Shipping terms: {}\n", result.shipping_terms));
    }
    output.push('\n');

    output.push_str("Products:\n");
    for (i, product) in result.products.iter().enumerate() {
        output.push_str(&format!(
            "  {}. {}  {} x {} = {}\n",
            i + 1,
            product.name,
            product.quantity,
            product.unit_price,
            product.subtotal
        ));
    }
    output.push('\n');

    output.push_str(&format!("Total: {} {}\n", result.total_amount, result.currency));
    output.push_str(&format!("Status: {}\n", result.status));

    output
}
