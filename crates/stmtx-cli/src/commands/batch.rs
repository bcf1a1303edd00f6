//! Batch processing command for multiple statement files.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use stmtx_core::models::config::StmtxConfig;
use stmtx_core::models::statement::{Field, FieldRecord};
use stmtx_core::statement::{CascadeParser, StatementParser};

use super::output::{format_record, OutputFormat};

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

    /// Also generate a summary of all files
    #[arg(long)]
    summary: bool,

    /// Summary file format
    #[arg(long, value_enum, default_value = "csv")]
    summary_format: SummaryFormat,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SummaryFormat {
    /// One CSV row per file
    Csv,
    /// JSON document with totals
    Json,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<FieldRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

impl ProcessResult {
    fn filename(&self) -> &str {
        self.path.file_name().and_then(|s| s.to_str()).unwrap_or("")
    }
}

/// One summary row; failed files carry an empty record and the error.
#[derive(Serialize)]
struct SummaryRow<'a> {
    filename: &'a str,
    status: &'static str,
    #[serde(flatten)]
    record: FieldRecord,
    processing_time_ms: u64,
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct Summary<'a> {
    generated_at: String,
    total: usize,
    successful: usize,
    failed: usize,
    unique_issuers: usize,
    documents: Vec<SummaryRow<'a>>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = Arc::new(super::load_config(config_path)?);

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| super::is_supported_input(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
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

    // Workers run on the blocking pool, at most `jobs` at a time
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = semaphore.clone().acquire_owned().await?;
        let config = Arc::clone(&config);
        let pb = overall_pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let result = process_single_file(&path, &config);
            pb.inc(1);
            (path, result, file_start.elapsed().as_millis() as u64)
        }));
    }

    // Collect in input order
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let (path, result, processing_time_ms) = handle.await?;

        match result {
            Ok(record) => results.push(ProcessResult {
                path,
                record: Some(record),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        record: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }
    }

    overall_pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(record) = &result.record {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("statement");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_record(record, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let file_name = match args.summary_format {
            SummaryFormat::Csv => "summary.csv",
            SummaryFormat::Json => "summary.json",
        };
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join(file_name))
            .unwrap_or_else(|| PathBuf::from(file_name));

        match args.summary_format {
            SummaryFormat::Csv => write_summary_csv(&summary_path, &results)?,
            SummaryFormat::Json => write_summary_json(&summary_path, &results)?,
        }
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );
    println!("   {} unique issuers", unique_issuers(&results));

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(path: &Path, config: &StmtxConfig) -> anyhow::Result<FieldRecord> {
    let text = super::read_statement_text(path, config)?;
    Ok(CascadeParser::from_config(&config.extraction).parse(&text).record)
}

/// Number of distinct issuers among the successfully processed files.
fn unique_issuers(results: &[ProcessResult]) -> usize {
    results
        .iter()
        .filter_map(|result| result.record.as_ref()?.issuer)
        .collect::<BTreeSet<_>>()
        .len()
}

fn summary_rows(results: &[ProcessResult]) -> Vec<SummaryRow<'_>> {
    results
        .iter()
        .map(|result| SummaryRow {
            filename: result.filename(),
            status: if result.record.is_some() { "success" } else { "error" },
            record: result.record.clone().unwrap_or_default(),
            processing_time_ms: result.processing_time_ms,
            error: result.error.as_deref(),
        })
        .collect()
}

fn write_summary_csv(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(Field::ALL.map(|field| field.key()));
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for row in summary_rows(results) {
        let processing_time = row.processing_time_ms.to_string();
        let mut record = vec![row.filename, row.status];
        record.extend(row.record.entries().map(|(_, value)| value.unwrap_or("")));
        record.extend([processing_time.as_str(), row.error.unwrap_or("")]);
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_summary_json(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let documents = summary_rows(results);
    let successful = documents.iter().filter(|row| row.error.is_none()).count();

    let summary = Summary {
        generated_at: chrono::Local::now().to_rfc3339(),
        total: documents.len(),
        successful,
        failed: documents.len() - successful,
        unique_issuers: unique_issuers(results),
        documents,
    };

    fs::write(path, serde_json::to_string_pretty(&summary)?)?;
    Ok(())
}
