use polars::prelude::*;

use gdp_analyzer::config::{Config, Year};
use gdp_analyzer::data::{load_dataset, DataProcessor, LoaderError, ProcessorError};

fn gdp_table() -> DataFrame {
    df!(
        "Country Name" => &["A", "B", "C"],
        "Continent" => &["X", "X", "Y"],
        "2000" => &[Some(10.0), None, Some(5.0)],
    )
    .unwrap()
}

fn cell_str(df: &DataFrame, column: &str, i: usize) -> String {
    df.column(column)
        .unwrap()
        .get(i)
        .unwrap()
        .to_string()
        .trim_matches('"')
        .to_string()
}

fn cell_f64(df: &DataFrame, column: &str, i: usize) -> Option<f64> {
    df.column(column)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .get(i)
}

#[test]
fn filter_returns_only_matching_rows() {
    let table = gdp_table();

    let filtered = DataProcessor::filter_by_region(&table, "X").unwrap();

    assert_eq!(filtered.height(), 2);
    for i in 0..filtered.height() {
        assert_eq!(cell_str(&filtered, "Continent", i), "X");
    }
}

#[test]
fn filter_is_case_sensitive_and_exact() {
    let table = gdp_table();

    let err = DataProcessor::filter_by_region(&table, "x").unwrap_err();
    assert!(matches!(err, ProcessorError::RegionNotFound(_)));
}

#[test]
fn filter_on_absent_region_is_a_hard_stop() {
    let table = gdp_table();

    let err = DataProcessor::filter_by_region(&table, "Atlantis").unwrap_err();
    assert!(matches!(err, ProcessorError::RegionNotFound(region) if region == "Atlantis"));
}

#[test]
fn filter_without_continent_column_fails() {
    let table = df!(
        "Country Name" => &["A"],
        "2000" => &[1.0],
    )
    .unwrap();

    let err = DataProcessor::filter_by_region(&table, "X").unwrap_err();
    assert!(matches!(err, ProcessorError::RegionColumnMissing));
}

#[test]
fn extracting_missing_year_fails() {
    let table = gdp_table();

    let err = DataProcessor::gdp_for_year(&table, &Year::from(1999)).unwrap_err();
    assert!(matches!(err, ProcessorError::YearNotAvailable(_)));
}

#[test]
fn extraction_drops_nulls_and_preserves_order() {
    let table = gdp_table();

    let extracted = DataProcessor::gdp_for_year(&table, &Year::from(2000)).unwrap();

    let names: Vec<String> = extracted
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert_eq!(names, vec!["Country Name", "2000"]);

    // B had a null for 2000 and is dropped, never zero-filled.
    assert_eq!(extracted.height(), 2);
    assert_eq!(cell_str(&extracted, "Country Name", 0), "A");
    assert_eq!(cell_str(&extracted, "Country Name", 1), "C");
    assert_eq!(cell_f64(&extracted, "2000", 0), Some(10.0));
    assert_eq!(cell_f64(&extracted, "2000", 1), Some(5.0));
}

#[test]
fn extraction_is_idempotent() {
    let table = gdp_table();
    let year = Year::from(2000);

    let once = DataProcessor::gdp_for_year(&table, &year).unwrap();
    let twice = DataProcessor::gdp_for_year(&once, &year).unwrap();

    assert_eq!(once.height(), twice.height());
    for i in 0..once.height() {
        assert_eq!(
            cell_str(&once, "Country Name", i),
            cell_str(&twice, "Country Name", i)
        );
        assert_eq!(cell_f64(&once, "2000", i), cell_f64(&twice, "2000", i));
    }
}

#[test]
fn sum_and_average_over_known_values() {
    let table = df!(
        "Country Name" => &["A", "B", "C"],
        "2000" => &[1.0, 2.0, 3.0],
    )
    .unwrap();
    let year = Year::from(2000);

    let sum = DataProcessor::perform_operation(&table, &year, "sum").unwrap();
    let average = DataProcessor::perform_operation(&table, &year, "average").unwrap();

    assert!((sum - 6.0).abs() < 1e-12);
    assert!((average - 2.0).abs() < 1e-12);
}

#[test]
fn unknown_operation_fails() {
    let table = df!(
        "Country Name" => &["A"],
        "2000" => &[1.0],
    )
    .unwrap();

    let err = DataProcessor::perform_operation(&table, &Year::from(2000), "median").unwrap_err();
    assert!(matches!(err, ProcessorError::UnknownOperation(op) if op == "median"));
}

#[test]
fn end_to_end_pipeline() {
    let table = gdp_table();
    let config: Config = serde_json::from_str(
        r#"{"region": "X", "year": 2000, "operation": "sum", "output": "dashboard"}"#,
    )
    .unwrap();

    let (rows, result) = DataProcessor::process(&table, &config).unwrap();

    // Row B dropped for the null, row C excluded by region.
    assert_eq!(rows.height(), 1);
    assert_eq!(cell_str(&rows, "Country Name", 0), "A");
    assert!((result - 10.0).abs() < 1e-12);
}

#[test]
fn missing_source_file_fails_before_processing() {
    let err = load_dataset("data/definitely_not_here.csv").unwrap_err();
    assert!(matches!(err, LoaderError::NotFound(_)));
}

#[test]
fn loader_normalizes_region_and_trims_identifiers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gdp.csv");
    std::fs::write(
        &path,
        "Country Name,Country Code,Continent,2000,2001\n\
         \" Aruba \",ABW,,1000.5,1100\n\
         Albania,ALB, Europe ,2500,\n",
    )
    .unwrap();

    let df = load_dataset(&path).unwrap();

    assert_eq!(cell_str(&df, "Continent", 0), "Unknown");
    assert_eq!(cell_str(&df, "Continent", 1), "Europe");
    assert_eq!(cell_str(&df, "Country Name", 0), "Aruba");
    assert_eq!(cell_str(&df, "Country Code", 1), "ALB");

    // Empty numeric cell loads as null, not zero.
    assert_eq!(df.column("2001").unwrap().null_count(), 1);
    assert_eq!(cell_f64(&df, "2001", 0), Some(1100.0));
}

#[test]
fn loaded_dataset_flows_through_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gdp.csv");
    std::fs::write(
        &path,
        "Country Name,Country Code,Continent,2000\n\
         A,AAA,X,10\n\
         B,BBB,X,\n\
         C,CCC,Y,5\n",
    )
    .unwrap();

    let df = load_dataset(&path).unwrap();
    let config: Config = serde_json::from_str(
        r#"{"region": "X", "year": "2000", "operation": "average", "output": "none"}"#,
    )
    .unwrap();

    let (rows, result) = DataProcessor::process(&df, &config).unwrap();

    assert_eq!(rows.height(), 1);
    assert!((result - 10.0).abs() < 1e-12);
}
