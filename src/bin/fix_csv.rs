//! Offline repair utility for datasets mis-saved as Excel with a `.csv`
//! extension. Run by hand before the pipeline; the pipeline never invokes it.
//!
//! Usage: `fix_csv [input] [output]` (defaults to the pipeline's dataset
//! path and a `_fixed` sibling).

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use gdp_analyzer::repair::{self, SourceKind};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let mut args = env::args().skip(1);
    let input = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data").join("gdp_dataset.csv"));
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data").join("gdp_dataset_fixed.csv"));

    info!("repairing {} -> {}", input.display(), output.display());
    let outcome = repair::repair_dataset(&input, &output)
        .with_context(|| format!("failed to repair '{}'", input.display()))?;

    match outcome.kind {
        SourceKind::Spreadsheet => info!(
            "input was a spreadsheet container; rewrote {} rows as CSV",
            outcome.rows_written
        ),
        SourceKind::Delimited => info!(
            "salvaged delimited input: {} rows kept, {} skipped",
            outcome.rows_written, outcome.rows_skipped
        ),
    }
    info!("fixed file saved to {}", output.display());

    Ok(())
}
