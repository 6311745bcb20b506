//! Data module - CSV loading and the processing pipeline

mod loader;
mod processor;

pub use loader::{load_dataset, LoaderError};
pub use processor::{DataProcessor, ProcessorError};

/// Display-key column for rows.
pub const COUNTRY_COL: &str = "Country Name";
/// ISO code column, cleaned at load time when present.
pub const CODE_COL: &str = "Country Code";
/// Region label column used as the filter key.
pub const REGION_COL: &str = "Continent";
