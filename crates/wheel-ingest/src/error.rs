//! Errors from dataset ingestion.

use thiserror::Error;

/// Failures while turning an uploaded file into a dataset.
///
/// All variants are fatal for the upload attempt; the operator must supply
/// a different (or fixed) file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("spreadsheet parse error: {0}")]
    Spreadsheet(String),
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("file must contain a header row and at least one data row (found {found} rows)")]
    TooFewRows { found: usize },
    #[error("workbook has no worksheets")]
    NoWorksheet,
}
