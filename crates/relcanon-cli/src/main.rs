//! relcanon: translate logical query plans into canonical JSON
//!
//! Reads a batch of planner output, translates every statement, and writes
//! the canonical documents consumed by the equivalence checker.

use anyhow::{Context, Result};
use clap::Parser;
use relcanon_ir::canonical::{translate_batch, PlanBatch};
use std::path::PathBuf;
use tracing::info;

mod config;
mod logging;
mod output;

use config::{Config, OutputMode};

#[derive(Debug, Parser)]
#[command(name = "relcanon", version, about = "Translate logical query plans into canonical JSON")]
struct Cli {
    /// Plan batch (JSON) produced by the query planner
    input: PathBuf,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write one combined document or one document per statement pair
    #[arg(long, value_enum)]
    mode: Option<OutputMode>,

    /// Output directory
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Emit compact JSON
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::from_env().context("invalid environment configuration")?,
    };
    if let Some(mode) = cli.mode {
        config.output.mode = mode;
    }
    if let Some(out) = cli.out {
        config.output.directory = out;
    }
    if cli.compact {
        config.output.pretty = false;
    }

    config.apply_logging_env();
    logging::init();

    let batch = PlanBatch::load(&cli.input)
        .with_context(|| format!("failed to load plan batch {}", cli.input.display()))?;
    info!(
        input = %cli.input.display(),
        tables = batch.tables.len(),
        statements = batch.statements.len(),
        "loaded plan batch"
    );

    let document = translate_batch(&batch).context("plan batch translation failed")?;

    for path in output::write_document(&document, &config.output)? {
        info!(path = %path.display(), "wrote canonical document");
    }

    Ok(())
}
