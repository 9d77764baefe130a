//! Spreadsheet access.
//!
//! Reads the first sheet of a workbook into a [`Table`]: a header row plus
//! data rows of [`Cell`]s. Only this module knows about `calamine`; the loader
//! works on `Table` values, which tests can also build by hand.
//!
//! The file is read into memory in one go and parsed from the buffer, so a
//! failed read never leaves a half-parsed table behind.

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use chrono::NaiveDateTime;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Workbook has no sheets")]
    NoSheets,
}

/// A single spreadsheet value, reduced to what the loader distinguishes.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Float(f) => Cell::Number(*f),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => dt.as_datetime().map_or(Cell::Empty, Cell::DateTime),
            // ISO strings are left for the loader's date parser
            Data::DateTimeIso(s) => Cell::Text(s.clone()),
            Data::DurationIso(_) | Data::Error(_) => Cell::Empty,
        }
    }
}

/// Row-oriented table with named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Rows shorter than the header are fine; missing trailing
    /// cells read as blank.
    pub fn push_row(&mut self, cells: Vec<Cell>) {
        self.rows.push(cells);
    }

    /// Position of a column by header name, ignoring surrounding whitespace.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build a table from a sheet range: first row is the header.
    pub fn from_range(range: &Range<Data>) -> Self {
        let mut rows = range.rows();
        let headers = rows
            .next()
            .map(|header| header.iter().map(header_text).collect())
            .unwrap_or_default();
        let rows = rows
            .map(|row| row.iter().map(Cell::from).collect())
            .collect();
        Self { headers, rows }
    }
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Read the first sheet of the workbook at `path`.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn read_first_sheet(path: &Path) -> Result<Option<Table>, TableError> {
    if !path.exists() {
        return Ok(None);
    }
    let buffer = std::fs::read(path)?;
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
    let range = workbook.worksheet_range_at(0).ok_or(TableError::NoSheets)??;
    Ok(Some(Table::from_range(&range)))
}
