//! Generic raw table and CSV reader.
//!
//! Ingestion consumes a `RawTable` (ordered column names plus rows of cells)
//! and never needs to know which file format produced it.

use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::error::AppError;

/// A single raw cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Text cells are trimmed; blank text becomes `Empty`.
    pub fn text(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    /// Display form used for identity fields (product, labels).
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.trim().to_string(),
        }
    }
}

/// Rows of cells under named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
    /// Source records that could not be read at all.
    pub skipped_records: usize,
}

impl RawTable {
    /// Column names are trimmed and stripped of a leading UTF-8 BOM.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns: columns.iter().map(|c| normalize_header_name(c)).collect(),
            rows: Vec::new(),
            skipped_records: 0,
        }
    }

    /// Append a row, padding short rows with `Empty` and dropping extra cells.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Case-insensitive lookup on the trimmed column name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }
}

/// Read a CSV file into a `RawTable`.
///
/// Unreadable files and headers are fatal. A record that fails to parse is
/// skipped and counted in `skipped_records`.
pub fn read_csv_table(path: &Path) -> Result<RawTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let mut table = RawTable::new(headers.iter().map(str::to_string).collect());

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; CSV lines are 1-based.
        let line = idx + 2;
        match result {
            Ok(record) => table.push_row(record_cells(&record)),
            Err(e) => {
                tracing::debug!(line, error = %e, "skipping unreadable CSV record");
                table.skipped_records += 1;
            }
        }
    }

    Ok(table)
}

fn record_cells(record: &StringRecord) -> Vec<Cell> {
    record.iter().map(Cell::text).collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel sometimes emits UTF-8 CSVs with a BOM prefix on the first header.
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}
