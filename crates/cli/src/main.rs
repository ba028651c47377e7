//! bilan - rebuild balance-sheet tables from classified OCR tokens
//!
//! Reads one JSON file per table crop (as written by the layout classifier),
//! merges the reconstructed tables in file-name order and prints them, or the
//! solvency and liquidity ratios derived from them, as JSON on stdout.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use bilan_core::RatiosByYear;
use bilan_extract::{BatchDriver, DocumentPipeline};
use clap::{ArgAction, Parser, ValueEnum};
use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;

mod settings;

use settings::{collect_inputs, Settings};

/// What to print for the merged table.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Output {
    /// Key column plus one column per year (default)
    #[default]
    Table,
    /// Canonical metrics per year
    Metrics,
    /// Financial ratios per year
    Ratios,
}

#[derive(Parser, Debug)]
#[command(name = "bilan")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Token JSON files, or directories of them
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// TOML settings (tolerances, matcher, vocabulary)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = Output::Table)]
    output: Output,

    /// Label ratios with their French dashboard names
    #[arg(long, action = ArgAction::SetTrue)]
    labels: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let settings = match &args.config {
        Some(path) => Settings::load(path).await?,
        None => Settings::default(),
    };
    let engine = settings.ratio_engine()?;

    let inputs = collect_inputs(&args.paths).await?;
    tracing::info!("Processing {} document(s)", inputs.len());

    let driver = BatchDriver::new(DocumentPipeline::new(settings.extraction.clone()));
    let report = driver.run_files(&inputs).await.context("no table could be extracted")?;
    for failure in &report.failures {
        tracing::warn!("Skipped {}: {}", failure.document, failure.message);
    }
    tracing::info!(
        "Extracted {} row(s) from {} document(s)",
        report.table.rows.len(),
        report.processed
    );

    let out = match args.output {
        Output::Table => Value::Array(report.table.to_records()),
        Output::Metrics => serde_json::to_value(engine.matcher().metrics_by_year(&report.table)?)?,
        Output::Ratios => ratios_json(&engine.ratios_by_year(&report.table), args.labels),
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &out)?;
    writeln!(handle)?;
    Ok(())
}

fn ratios_json(ratios: &RatiosByYear, labels: bool) -> Value {
    let mut by_year = Map::new();
    for (year, values) in ratios {
        let inner: Map<String, Value> = values
            .iter()
            .map(|(ratio, v)| {
                let name = if labels { ratio.label() } else { ratio.as_str() };
                (name.to_string(), json!(v))
            })
            .collect();
        by_year.insert(year.to_string(), Value::Object(inner));
    }
    Value::Object(by_year)
}
