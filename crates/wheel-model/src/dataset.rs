//! Tabular dataset produced by the ingest stage.

use serde::{Deserialize, Serialize};

/// A parsed spreadsheet: one header row plus data rows.
///
/// Immutable once produced; every later stage reads it, none mutate it.
/// Cells are plain strings; no semantic interpretation happens at this
/// level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvDataset {
    /// Column headers from the first non-empty row.
    pub headers: Vec<String>,
    /// Data rows, each padded/truncated to the header width.
    pub rows: Vec<Vec<String>>,
    /// Name of the uploaded file (for job records and notifications).
    pub source_name: String,
}

impl CsvDataset {
    /// Number of data rows (excluding the header).
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The first `n` rows, used as the bounded sample sent for analysis.
    #[must_use]
    pub fn sample(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..self.rows.len().min(n)]
    }
}
