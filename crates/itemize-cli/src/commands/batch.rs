//! Batch processing command for multiple text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use itemize_core::models::config::OutputFormat;
use itemize_core::{ExtractionResult, ItemParser, LineItemParser};

use super::config::load_config;
use super::output::{render, sha256_hex, ParseResponse, ParseResult};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching input text files
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file results
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default from config)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Extraction output for one successfully read file.
struct FileExtraction {
    result: ExtractionResult,
    content_sha256: String,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Result<FileExtraction, String>,
    processing_time_ms: u64,
}

impl ProcessResult {
    fn filename(&self) -> &str {
        self.path.file_name().and_then(|s| s.to_str()).unwrap_or("")
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let format = args.format.unwrap_or(config.output.format);

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files",
            )?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(LineItemParser::from_config(&config.extraction));
    let jobs = args.jobs.max(1);

    // Results come back in input order regardless of completion order
    let results: Vec<ProcessResult> = stream::iter(files.into_iter().map(|path| {
        let parser = Arc::clone(&parser);
        let pb = overall_pb.clone();
        async move {
            let file_start = Instant::now();
            let worker_path = path.clone();
            let outcome =
                tokio::task::spawn_blocking(move || process_single_file(&worker_path, &parser))
                    .await
                    .unwrap_or_else(|e| Err(format!("worker failed: {}", e)));

            pb.inc(1);
            ProcessResult {
                path,
                outcome,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            }
        }
    }))
    .buffered(jobs)
    .collect()
    .await;

    overall_pb.finish_and_clear();

    for result in &results {
        if let Err(message) = &result.outcome {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                error!("Failed to process {}: {}", result.path.display(), message);
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), message);
            }
        }
    }

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Ok(extraction) = &result.outcome {
                write_file_output(output_dir, result, extraction, format, config.output.pretty)?;
            }
        }
    }

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

    let successful: Vec<_> = results.iter().filter(|r| r.outcome.is_ok()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.outcome.is_err()).collect();
    let items: usize = successful
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok())
        .map(|e| e.result.items.len())
        .sum();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} items",
        style(successful.len()).green(),
        style(failed.len()).red(),
        items
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(message) = &result.outcome {
                println!("  - {}: {}", result.path.display(), message);
            }
        }
    }

    Ok(())
}

fn process_single_file(path: &Path, parser: &LineItemParser) -> Result<FileExtraction, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    let text = String::from_utf8(bytes).map_err(|_| "file is not valid UTF-8".to_string())?;
    let result = parser.parse(&text).map_err(|e| e.to_string())?;

    debug!(
        "{}: {} items from {} candidate lines",
        path.display(),
        result.items.len(),
        result.stats.candidate_lines
    );

    Ok(FileExtraction {
        content_sha256: sha256_hex(text.as_bytes()),
        result,
    })
}

fn write_file_output(
    output_dir: &Path,
    result: &ProcessResult,
    extraction: &FileExtraction,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<()> {
    let output_name = result
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("items");
    let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));

    let response = ParseResponse::from_file(
        result.filename(),
        &extraction.content_sha256,
        ParseResult {
            input_index: 0,
            items: extraction.result.items.clone(),
        },
    )?;

    fs::write(&output_path, render(&response, format, pretty)?)?;
    debug!("Wrote output to {}", output_path.display());

    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "items",
        "mean_confidence",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let time_ms = result.processing_time_ms.to_string();

        match &result.outcome {
            Ok(extraction) => {
                let mean = extraction
                    .result
                    .mean_confidence()
                    .map(|c| format!("{:.2}", c))
                    .unwrap_or_default();
                let items = extraction.result.items.len().to_string();
                wtr.write_record([
                    result.filename(),
                    "success",
                    items.as_str(),
                    mean.as_str(),
                    time_ms.as_str(),
                    "",
                ])?;
            }
            Err(message) => {
                wtr.write_record([
                    result.filename(),
                    "error",
                    "",
                    "",
                    time_ms.as_str(),
                    message.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
