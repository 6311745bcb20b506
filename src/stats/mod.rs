//! Stats module - descriptive statistics and histogram binning

mod calculator;

pub use calculator::{compute_descriptive_stats, histogram, DescriptiveStats, HistogramBin};
