//! Input tables: raw workbook sheets for splitting, and header-named CSV or
//! JSON tables for assembling.

mod delimited;
mod records;

use crate::error::ResultMessage;
use crate::error::SourceError;
use crate::spreadsheet::open_spreadsheet;
use crate::table::{Grid, Table};
use std::path::Path;
use thiserror::Error;

/// Errors raised by the text table readers.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Unsupported table format '{0}', expected .csv or .json")]
    UnsupportedTableFormat(String),

    #[error("JSON table must be an array of records or an object of columns, found {0}")]
    InvalidJsonShape(String),
}

/// Worksheet names of a workbook, in workbook order.
pub fn list_sheets(path: &Path) -> Result<Vec<String>, SourceError> {
    open_spreadsheet(path)?.sheet_names()
}

/// Reads one worksheet as a raw grid with no header interpretation.
pub fn read_sheet(path: &Path, sheet: &str) -> Result<Grid, SourceError> {
    open_spreadsheet(path)?.read_sheet(sheet)
}

/// Reads a `.csv` or `.json` table; its first record or its keys name the columns.
pub fn read_table(path: &Path) -> Result<Table, SourceError> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let name = path.display().to_string();
    match extension.as_str() {
        "csv" => delimited::read(path).with_prefix(&name),
        "json" => records::read(path).with_prefix(&name),
        _ => Err(TableError::UnsupportedTableFormat(name))?,
    }
}
