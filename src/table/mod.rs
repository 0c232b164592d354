//! In-memory tables: the raw cell grid read from a sheet, and header-named
//! tables produced by slicing or read from text sources.

pub mod chunk;
pub mod range;

use std::borrow::Cow;
use std::fmt::Display;

/// Value of one cell after reading.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Text projection used for header names and text encoders.
    /// Integral numbers drop their fractional part (`5`, not `5.0`).
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Empty => Cow::Borrowed(""),
            CellValue::Text(text) => Cow::Borrowed(text),
            CellValue::Number(number) => Cow::Owned(format_number(*number)),
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

fn format_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// Raw rectangular grid of a sheet, with no header interpretation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl Grid {
    /// Builds a grid, padding ragged rows with [`CellValue::Empty`].
    pub fn from_rows(mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }
        Self { rows, width }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }
}

/// Table whose columns are named; every row has one cell per column.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Builds a table, padding or truncating each row to the column count.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        for row in &mut rows {
            row.resize(columns.len(), CellValue::Empty);
        }
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn view(&self) -> TableView<'_> {
        TableView {
            columns: &self.columns,
            rows: &self.rows,
        }
    }
}

/// Borrowed window onto a [`Table`]: all of its columns and a run of its rows.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TableView<'a> {
    columns: &'a [String],
    rows: &'a [Vec<CellValue>],
}

impl<'a> TableView<'a> {
    pub fn new(columns: &'a [String], rows: &'a [Vec<CellValue>]) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    pub fn rows(&self) -> &'a [Vec<CellValue>] {
        self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
