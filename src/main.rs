//! GDP Analyzer - dataset loading, aggregation, and chart generation.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use gdp_analyzer::charts::{self, ChartRenderer, ReportSummary};
use gdp_analyzer::config::Config;
use gdp_analyzer::data::{self, DataProcessor};

const CONFIG_FILE: &str = "config.json";

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

    info!("loading configuration from {}", config_path.display());
    let config = Config::load(&config_path).context("failed to load configuration")?;
    info!(
        "region={} year={} operation={}",
        config.region, config.year, config.operation
    );

    info!("loading dataset from {}", config.data_file.display());
    let df = data::load_dataset(&config.data_file).context("failed to load dataset")?;
    info!("loaded {} rows, {} columns", df.height(), df.width());

    let (year_table, result) =
        DataProcessor::process(&df, &config).context("failed to process dataset")?;
    info!(
        "{} of GDP for {} in {}: {:.2}",
        config.operation, config.region, config.year, result
    );

    if config.output == "dashboard" {
        let series = charts::country_values(&year_table, &config.year)
            .context("failed to extract chart data")?;
        let summary = ReportSummary::new(&config, &series, result);
        println!("{}", summary.to_text());

        let renderer = ChartRenderer::new(config.render_mode, config.backend, &config.output_dir);
        let paths = renderer
            .render_dashboard(&series, &summary)
            .context("failed to render dashboard")?;
        for path in &paths {
            info!("chart written to {}", path.display());
        }
    }

    Ok(())
}
