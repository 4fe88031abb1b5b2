//! Parse command - extract line items from one text input.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use tracing::{debug, info};

use itemize_core::models::config::OutputFormat;
use itemize_core::{ExtractionStats, ItemParser, LineItemParser};

use super::config::load_config;
use super::output::{render, ParseResponse, ParseResult};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    /// Inline text to parse; repeat for several inputs
    #[arg(short, long = "text", conflicts_with = "input")]
    texts: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format: json, csv or text (default from config)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Drop items scoring below this confidence
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print extraction statistics to stderr
    #[arg(long)]
    show_stats: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(min_confidence) = args.min_confidence {
        config.extraction.min_confidence = min_confidence;
    }
    config.validate()?;

    let format = args.format.unwrap_or(config.output.format);
    let pretty = args.pretty || config.output.pretty;

    let inputs = read_inputs(&args)?;
    info!("Parsing {} input(s)", inputs.len());

    let parser = LineItemParser::from_config(&config.extraction);
    let mut results = Vec::with_capacity(inputs.len());
    let mut totals = ExtractionStats::default();

    for (input_index, text) in inputs.iter().enumerate() {
        let extraction = parser
            .parse(text)
            .with_context(|| format!("input at index {} rejected", input_index))?;

        totals += extraction.stats;

        results.push(ParseResult {
            input_index,
            items: extraction.items,
        });
    }

    let response = ParseResponse::from_inputs(&inputs, results)?;
    let rendered = render(&response, format, pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", rendered.trim_end());
    }

    if args.show_stats {
        print_stats(&totals);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_inputs(args: &ParseArgs) -> anyhow::Result<Vec<String>> {
    if !args.texts.is_empty() {
        return Ok(args.texts.clone());
    }

    let text = match &args.input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    Ok(vec![text])
}

fn print_stats(stats: &ExtractionStats) {
    eprintln!();
    eprintln!(
        "{} {} candidate lines: {} extracted, {} noise, {} unmatched, {} below threshold",
        style("ℹ").blue(),
        stats.candidate_lines,
        style(stats.extracted).green(),
        stats.noise_lines,
        stats.unmatched_lines,
        stats.below_threshold
    );
}
