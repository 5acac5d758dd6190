//! Classify command - show the layout scores of a text.

use std::path::PathBuf;

use clap::Args;
use console::style;

use poex_core::{Classification, PoParser};

use super::{load_config, read_input};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Input text file (`-` for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Print the classification as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let text = read_input(&args.input)?;

    let classification = PoParser::new().with_config(config).classify(&text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        print!("{}", format_classification(&classification));
    }

    Ok(())
}

fn format_classification(classification: &Classification) -> String {
    let mut output = format!(
        "{} {} ({}) - confidence {:.2}\n",
        style("Format:").bold(),
        classification.format_type,
        classification.format_type.label(),
        classification.confidence
    );

    for score in &classification.breakdown {
        output.push_str(&format!(
            "  {:<8} {}/{}",
            score.format_type.as_str(),
            score.score,
            score.max_score
        ));
        if !score.matched.is_empty() {
            output.push_str(&format!("  [{}]", score.matched.join(", ")));
        }
        output.push('\n');
    }

    output
}
