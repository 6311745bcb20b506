//! Data Processor Module
//! The pipeline core: region filter, year extraction, aggregation.

use polars::prelude::*;
use thiserror::Error;

use crate::config::{Config, Year};

use super::{COUNTRY_COL, REGION_COL};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("column 'Continent' not found in dataset")]
    RegionColumnMissing,
    #[error("no data found for region: {0}")]
    RegionNotFound(String),
    #[error("year {0} not available in dataset")]
    YearNotAvailable(Year),
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}

/// The filter → extract → aggregate pipeline over a loaded dataset.
///
/// Every step is a pure function from an input frame to a new derived frame
/// or a failure; nothing is retried and no defaults are substituted.
pub struct DataProcessor;

impl DataProcessor {
    /// Keep only rows whose `Continent` equals `region` exactly.
    ///
    /// Zero matches is a hard stop, not an empty pass-through.
    pub fn filter_by_region(df: &DataFrame, region: &str) -> Result<DataFrame, ProcessorError> {
        if df.column(REGION_COL).is_err() {
            return Err(ProcessorError::RegionColumnMissing);
        }

        let filtered = df
            .clone()
            .lazy()
            .filter(col(REGION_COL).eq(lit(region)))
            .collect()?;

        if filtered.height() == 0 {
            return Err(ProcessorError::RegionNotFound(region.to_string()));
        }
        Ok(filtered)
    }

    /// Project the table to `Country Name` plus one year column.
    ///
    /// Rows with a null value for that year are dropped, not zero-filled: a
    /// null is unreported GDP and must not bias the aggregate. Input row
    /// order is preserved.
    pub fn gdp_for_year(df: &DataFrame, year: &Year) -> Result<DataFrame, ProcessorError> {
        let year_col = year.column_name();
        if df.column(year_col).is_err() {
            return Err(ProcessorError::YearNotAvailable(year.clone()));
        }

        let country_series = df.column(COUNTRY_COL)?;
        let value_f64 = df.column(year_col)?.cast(&DataType::Float64)?;
        let value_ca = value_f64.f64()?;

        let mut countries: Vec<String> = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        for i in 0..df.height() {
            if let (Ok(name), Some(value)) = (country_series.get(i), value_ca.get(i)) {
                if !name.is_null() {
                    countries.push(name.to_string().trim_matches('"').to_string());
                    values.push(value);
                }
            }
        }

        let selected = DataFrame::new(vec![
            Column::new(COUNTRY_COL.into(), countries),
            Column::new(year_col.into(), values),
        ])?;

        Ok(selected)
    }

    /// Reduce the year column to a single scalar.
    ///
    /// `average` is the arithmetic mean over the non-null values; `sum` the
    /// arithmetic sum. No rounding is applied here; formatting belongs to
    /// the presentation boundary.
    pub fn perform_operation(
        df: &DataFrame,
        year: &Year,
        operation: &str,
    ) -> Result<f64, ProcessorError> {
        let value_f64 = df.column(year.column_name())?.cast(&DataType::Float64)?;
        let values = value_f64.f64()?;

        match operation {
            "average" => Ok(values.mean().unwrap_or(f64::NAN)),
            "sum" => Ok(values.sum().unwrap_or(0.0)),
            other => Err(ProcessorError::UnknownOperation(other.to_string())),
        }
    }

    /// Run the fixed Filter → Extractor → Aggregator sequence.
    ///
    /// Failures from any step propagate unchanged; the caller decides how to
    /// present them. Returns the year-extracted rows together with the
    /// scalar aggregate.
    pub fn process(df: &DataFrame, config: &Config) -> Result<(DataFrame, f64), ProcessorError> {
        let regional = Self::filter_by_region(df, &config.region)?;
        let yearly = Self::gdp_for_year(&regional, &config.year)?;
        let result = Self::perform_operation(&yearly, &config.year, &config.operation)?;

        Ok((yearly, result))
    }
}
