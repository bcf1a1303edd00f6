//! Process command - extract fields from a single statement.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use stmtx_core::models::statement::Field;
use stmtx_core::statement::{CascadeParser, ExtractionResult, StatementParser};

use super::output::{format_record, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show which rule produced each field
    #[arg(long)]
    explain: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading statement text...");
    let text = super::read_statement_text(&args.input, &config)?;

    pb.set_message("Extracting fields...");
    let result = CascadeParser::from_config(&config.extraction).parse(&text);

    pb.finish_and_clear();

    let output = format_record(&result.record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.explain {
        explain(&result);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Print the tier and rule behind each field to stderr.
fn explain(result: &ExtractionResult) {
    eprintln!();
    for field in Field::ALL {
        match result.provenance.get(&field) {
            Some(provenance) => eprintln!(
                "{} {:<17} {:?} rule '{}'",
                style("ℹ").blue(),
                field.key(),
                provenance.tier,
                provenance.rule
            ),
            None => eprintln!(
                "{} {:<17} {}",
                style("ℹ").blue(),
                field.key(),
                style("not found").yellow()
            ),
        }
    }
    eprintln!(
        "{} Extracted {}/{} fields in {}ms",
        style("ℹ").blue(),
        result.record.populated_count(),
        Field::ALL.len(),
        result.processing_time_ms
    );
}
