//! Dataset Loader Module
//! Handles CSV file loading and basic cleaning using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{CODE_COL, COUNTRY_COL, REGION_COL};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("the file '{}' was not found", .0.display())]
    NotFound(PathBuf),
    #[error("error reading CSV file: {0}")]
    Csv(#[from] PolarsError),
}

/// Load the GDP dataset from a CSV file.
///
/// Parsing is lenient at the value level: numeric year columns keep their
/// numeric type and entries that fail to parse become null. After the parse,
/// one cleaning pass runs:
///
/// - a null `Continent` becomes the literal string `"Unknown"`;
/// - `Country Name`, `Country Code`, and `Continent` (whichever are present)
///   are coerced to string and stripped of surrounding whitespace.
///
/// No other column is touched.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoaderError::NotFound(path.to_path_buf()));
    }

    // Lazy scan, then collect; inference covers the whole header block of
    // typical GDP exports.
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10_000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    clean(df)
}

fn clean(df: DataFrame) -> Result<DataFrame, LoaderError> {
    let mut cleanups: Vec<Expr> = Vec::new();

    if df.column(REGION_COL).is_ok() {
        cleanups.push(
            col(REGION_COL)
                .cast(DataType::String)
                .fill_null(lit("Unknown"))
                .str()
                .strip_chars(lit(NULL)),
        );
    }
    for name in [COUNTRY_COL, CODE_COL] {
        if df.column(name).is_ok() {
            cleanups.push(col(name).cast(DataType::String).str().strip_chars(lit(NULL)));
        }
    }

    if cleanups.is_empty() {
        return Ok(df);
    }
    Ok(df.lazy().with_columns(cleanups).collect()?)
}
