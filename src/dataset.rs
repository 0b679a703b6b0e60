//! The dataset loader: reads the sales spreadsheet into a `SalesTable`.
//!
//! The dataset is a build-time fixture, so a missing file, a missing sheet or
//! a header row that does not match the fixed schema is a fatal startup
//! error. Individual malformed data rows, by contrast, are silently dropped
//! (their count lands in a debug log).

use crate::model::{SalesColumn, SalesTable, Transaction};
use crate::Result;
use anyhow::{bail, Context};
use calamine::{Data, DataType, Reader};
use std::path::Path;
use tracing::{debug, info};

/// Loads the spreadsheet at `path` into a `SalesTable`, dispatching on the
/// file extension: `.csv` reads as CSV, anything else as a workbook with the
/// named sheet.
pub fn load(path: &Path, sheet_name: &str) -> Result<SalesTable> {
    let table = match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => load_csv(path)?,
        _ => load_workbook(path, sheet_name)?,
    };
    info!(
        "Loaded {} transactions from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

/// Reads the named sheet of an Excel workbook.
pub fn load_workbook(path: &Path, sheet_name: &str) -> Result<SalesTable> {
    let mut workbook = calamine::open_workbook_auto(path)
        .with_context(|| format!("Unable to open workbook at '{}'", path.display()))?;
    let range = workbook
        .worksheet_range(sheet_name)
        .with_context(|| format!("Sheet '{sheet_name}' not found in '{}'", path.display()))?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<String>>());
    from_rows(rows)
}

/// Reads a CSV rendition of the dataset. Rows flow through the same header
/// scan and cleaning as the workbook path.
pub fn load_csv(path: &Path) -> Result<SalesTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Unable to open CSV file at '{}'", path.display()))?;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.context("Failed to read a CSV record")?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    from_rows(rows)
}

/// Builds the table from raw string rows: locates and validates the header
/// row, then parses and cleans every data row below it.
pub(crate) fn from_rows(rows: impl IntoIterator<Item = Vec<String>>) -> Result<SalesTable> {
    let mut rows = rows.into_iter();

    // Skip leading non-data rows until the header row turns up. The sheet may
    // carry a leading unnamed index column ahead of the schema's columns.
    let offset = loop {
        let Some(row) = rows.next() else {
            bail!(
                "Could not locate the '{}' header row; the sheet does not match the expected schema",
                SalesColumn::Retailer.header_str()
            );
        };
        if let Some(offset) = header_offset(&row) {
            validate_header(&row, offset)?;
            break offset;
        }
    };

    let mut kept: Vec<Transaction> = Vec::new();
    let mut dropped = 0usize;
    for row in rows {
        let cells = &row[offset.min(row.len())..];
        match Transaction::from_row(cells) {
            Some(t) => kept.push(t),
            None => dropped += 1,
        }
    }
    debug!("Parsed data rows: kept {}, dropped {}", kept.len(), dropped);
    Ok(SalesTable::new(kept))
}

/// Returns the position of the first schema column within `row`, if this is
/// the header row.
fn header_offset(row: &[String]) -> Option<usize> {
    row.iter()
        .position(|cell| cell.trim() == SalesColumn::Retailer.header_str())
}

/// After realignment the remaining cells must match the fixed schema exactly;
/// anything else is a fatal schema mismatch.
fn validate_header(row: &[String], offset: usize) -> Result<()> {
    let headers: Vec<&str> = row[offset..]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if headers != SalesColumn::HEADERS {
        bail!(
            "Header row does not match the expected schema: expected {:?}, got {:?}",
            SalesColumn::HEADERS,
            headers
        );
    }
    Ok(())
}

/// Normalizes one workbook cell to the string form the row parser expects;
/// date cells become ISO dates.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => cell
            .as_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn data_row(date: &str, units: &str, total: &str) -> Vec<String> {
        strings(&[
            "1", // index column
            "Foot Locker",
            "1185732",
            date,
            "Northeast",
            "New York",
            "New York",
            "Men's Street Footwear",
            "50.00",
            units,
            total,
            "300000",
            "0.5",
            "In-store",
        ])
    }

    fn header_row() -> Vec<String> {
        let mut row = strings(&["Index"]);
        row.extend(SalesColumn::HEADERS.iter().map(|h| h.to_string()));
        row
    }

    #[test]
    fn test_from_rows_skips_leading_junk_and_index_column() {
        let rows = vec![
            strings(&["Adidas US Sales"]),
            strings(&[]),
            strings(&["", "some banner text"]),
            header_row(),
            data_row("2020-01-01", "1200", "600000"),
            data_row("2020-01-02", "800", "400000"),
        ];
        let table = from_rows(rows).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows()[0].invoice_date,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        assert_eq!(table.rows()[0].retailer, "Foot Locker");
    }

    #[test]
    fn test_from_rows_drops_bad_data_rows() {
        let rows = vec![
            header_row(),
            data_row("2020-01-01", "1200", "600000"),
            data_row("not-a-date", "1200", "600000"),
            data_row("2020-01-03", "0", "600000"),
            data_row("2020-01-04", "1200", ""),
        ];
        let table = from_rows(rows).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_from_rows_fails_without_header() {
        let rows = vec![
            strings(&["junk"]),
            data_row("2020-01-01", "1200", "600000"),
        ];
        assert!(from_rows(rows).is_err());
    }

    #[test]
    fn test_from_rows_fails_on_schema_mismatch() {
        // Header present but a column is missing.
        let mut header = header_row();
        header.remove(header.len() - 2);
        let rows = vec![header, data_row("2020-01-01", "1200", "600000")];
        assert!(from_rows(rows).is_err());
    }

    #[test]
    fn test_header_without_index_column() {
        let header: Vec<String> = SalesColumn::HEADERS.iter().map(|h| h.to_string()).collect();
        let mut row = data_row("2020-01-01", "1200", "600000");
        row.remove(0); // no index column either
        let table = from_rows(vec![header, row]).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_cell_to_string_variants() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("x".to_string())), "x");
        assert_eq!(cell_to_string(&Data::Float(50.0)), "50");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(
            cell_to_string(&Data::DateTimeIso("2020-01-05T00:00:00".to_string())),
            "2020-01-05"
        );
    }

    #[test]
    fn test_load_csv_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("sales.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Index,{}", SalesColumn::HEADERS.join(",")).unwrap();
        writeln!(
            file,
            "1,Foot Locker,1185732,2020-01-01,Northeast,New York,New York,Shoes,50.00,1200,600000,300000,0.5,In-store"
        )
        .unwrap();
        writeln!(
            file,
            "2,Foot Locker,1185732,2020-01-02,Northeast,New York,New York,Shoes,50.00,0,600000,300000,0.5,In-store"
        )
        .unwrap();

        let table = load(&path, "ignored").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].units_sold, 1200);
    }

    #[test]
    fn test_load_workbook_missing_file_fails() {
        let err = load_workbook(Path::new("/does/not/exist.xlsx"), "Data Sales Adidas");
        assert!(err.is_err());
    }
}
