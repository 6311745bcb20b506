//! Charts module - dashboard rendering and the textual report

mod renderer;
mod summary;

pub use renderer::{ChartError, ChartRenderer};
pub use summary::{format_usd, ReportSummary};

use polars::prelude::*;

use crate::config::Year;
use crate::data::COUNTRY_COL;

/// Flatten the year-extracted table into (country, value) pairs for the
/// renderer and the report.
pub fn country_values(df: &DataFrame, year: &Year) -> Result<Vec<(String, f64)>, ChartError> {
    let country_series = df.column(COUNTRY_COL)?;
    let value_f64 = df.column(year.column_name())?.cast(&DataType::Float64)?;
    let value_ca = value_f64.f64()?;

    let mut series = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        if let (Ok(name), Some(value)) = (country_series.get(i), value_ca.get(i)) {
            if !name.is_null() {
                series.push((name.to_string().trim_matches('"').to_string(), value));
            }
        }
    }

    Ok(series)
}
