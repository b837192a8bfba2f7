//! Spreadsheet readers: CSV via the `csv` crate, Excel via `calamine`.
//!
//! Purely structural: cells come out as trimmed strings, fully-empty rows
//! are dropped, and the first surviving row is the header. No dates, colors
//! or references are interpreted here.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;
use tracing::debug;

use wheel_model::CsvDataset;

use crate::error::ParseError;

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn is_empty_row(row: &[String]) -> bool {
    row.iter().all(|value| value.trim().is_empty())
}

/// Pad or truncate `row` to the header width.
fn align_row(row: Vec<String>, width: usize) -> Vec<String> {
    let mut row = row;
    row.resize(width, String::new());
    row
}

/// Read an uploaded spreadsheet into a [`CsvDataset`].
///
/// Dispatches on the file extension: `.csv` uses the `csv` crate, `.xlsx`,
/// `.xlsm`, `.xls` and `.ods` go through `calamine` (first worksheet only).
///
/// # Errors
///
/// [`ParseError::TooFewRows`] when the file lacks a header plus at least
/// one data row, [`ParseError::UnsupportedFormat`] for unknown extensions,
/// and the underlying I/O or format errors otherwise.
pub fn read_dataset(path: &Path) -> Result<CsvDataset, ParseError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let raw_rows = match extension.as_str() {
        "csv" => read_csv_rows(path)?,
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook_rows(path)?,
        other => return Err(ParseError::UnsupportedFormat(other.to_string())),
    };

    if raw_rows.len() < 2 {
        return Err(ParseError::TooFewRows {
            found: raw_rows.len(),
        });
    }

    let mut rows_iter = raw_rows.into_iter();
    let headers: Vec<String> = rows_iter.next().unwrap_or_default();
    let width = headers.len();
    let rows: Vec<Vec<String>> = rows_iter.map(|row| align_row(row, width)).collect();

    let source_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("import")
        .to_string();

    debug!(
        source = %source_name,
        columns = headers.len(),
        rows = rows.len(),
        "parsed dataset"
    );

    Ok(CsvDataset {
        headers,
        rows,
        source_name,
    })
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(ParseError::Csv)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if is_empty_row(&row) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

fn read_workbook_rows(path: &Path) -> Result<Vec<Vec<String>>, ParseError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ParseError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ParseError::NoWorksheet)?
        .map_err(|e| ParseError::Spreadsheet(e.to_string()))?;

    let mut rows = Vec::new();
    for row in range.rows() {
        let cells: Vec<String> = row.iter().map(cell_to_string).collect();
        if is_empty_row(&cells) {
            continue;
        }
        rows.push(cells);
    }
    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => normalize_cell(s),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => normalize_cell(&other.to_string()),
    }
}
