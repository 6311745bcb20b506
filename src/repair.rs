//! Dataset Repair Module
//! Recovers a dataset saved as a spreadsheet with a `.csv` extension.
//!
//! This is an offline utility surfaced by the `fix_csv` binary; the pipeline
//! loader never calls into it. Run it by hand when a download turns out to
//! be an XLSX container, or a delimited file with damaged lines, then point
//! the pipeline at the repaired output.

use calamine::{open_workbook_auto, Data, Reader};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepairError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("workbook has no sheets")]
    EmptyWorkbook,
}

/// XLSX documents are ZIP containers; this is the ZIP local-file-header magic.
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Spreadsheet,
    Delimited,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Spreadsheet => f.write_str("spreadsheet"),
            SourceKind::Delimited => f.write_str("delimited"),
        }
    }
}

/// What a repair run did.
#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub kind: SourceKind,
    pub rows_written: usize,
    pub rows_skipped: usize,
}

/// True if the file starts with the ZIP magic, i.e. it is a spreadsheet
/// container regardless of its extension.
pub fn is_missaved_spreadsheet(path: impl AsRef<Path>) -> Result<bool, RepairError> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 4];
    let read = file.read(&mut header)?;
    Ok(read == header.len() && header == ZIP_MAGIC)
}

/// Rewrite `input` as true delimited text at `output`.
///
/// A spreadsheet container is re-read with the Excel engine (first sheet);
/// anything else gets a lenient re-parse that keeps only rows matching the
/// width of the first row and counts what it skipped.
pub fn repair_dataset(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<RepairOutcome, RepairError> {
    if is_missaved_spreadsheet(&input)? {
        convert_spreadsheet(input, output)
    } else {
        salvage_delimited(input, output)
    }
}

fn convert_spreadsheet(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<RepairOutcome, RepairError> {
    let mut workbook = open_workbook_auto(input)?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(RepairError::EmptyWorkbook)?;
    let range = workbook.worksheet_range(&sheet)?;

    let mut writer = csv::Writer::from_path(output)?;
    let mut rows_written = 0usize;
    for row in range.rows() {
        let record: Vec<String> = row.iter().map(cell_to_string).collect();
        writer.write_record(&record)?;
        rows_written += 1;
    }
    writer.flush()?;

    Ok(RepairOutcome {
        kind: SourceKind::Spreadsheet,
        rows_written,
        rows_skipped: 0,
    })
}

fn salvage_delimited(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<RepairOutcome, RepairError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(input)?;
    let mut writer = csv::Writer::from_path(output)?;

    let mut expected_width: Option<usize> = None;
    let mut rows_written = 0usize;
    let mut rows_skipped = 0usize;

    for record in reader.records() {
        match record {
            Ok(record) => {
                // First row fixes the expected width.
                let width = *expected_width.get_or_insert(record.len());
                if record.len() == width {
                    writer.write_record(&record)?;
                    rows_written += 1;
                } else {
                    rows_skipped += 1;
                }
            }
            Err(_) => rows_skipped += 1,
        }
    }
    writer.flush()?;

    Ok(RepairOutcome {
        kind: SourceKind::Delimited,
        rows_written,
        rows_skipped,
    })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Year headers and codes round-trip as integers, not "2000.0".
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn detects_zip_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missaved.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"PK\x03\x04rest-of-container").unwrap();

        assert!(is_missaved_spreadsheet(&path).unwrap());
    }

    #[test]
    fn plain_text_is_not_a_spreadsheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.csv");
        std::fs::write(&path, "a,b,c\n1,2,3\n").unwrap();

        assert!(!is_missaved_spreadsheet(&path).unwrap());
    }

    #[test]
    fn salvage_skips_rows_of_wrong_width() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("damaged.csv");
        let output = dir.path().join("fixed.csv");
        std::fs::write(
            &input,
            "Country Name,Continent,2000\nA,X,10\nbroken-row\nB,Y,5\n",
        )
        .unwrap();

        let outcome = repair_dataset(&input, &output).unwrap();

        assert_eq!(outcome.kind, SourceKind::Delimited);
        assert_eq!(outcome.rows_written, 3); // header + two data rows
        assert_eq!(outcome.rows_skipped, 1);

        let fixed = std::fs::read_to_string(&output).unwrap();
        assert!(fixed.contains("Country Name,Continent,2000"));
        assert!(!fixed.contains("broken-row"));
    }

    #[test]
    fn integral_floats_round_trip_as_integers() {
        assert_eq!(cell_to_string(&Data::Float(2000.0)), "2000");
        assert_eq!(cell_to_string(&Data::Float(10.5)), "10.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
