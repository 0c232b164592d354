//! # Workbook Readers
//!
//! Streams Office Open XML (.xlsx, .xlsm, .xlam) and OpenDocument (.ods)
//! workbooks into raw [`Grid`]s. Both containers are ZIP archives of XML parts,
//! parsed event by event with quick-xml.

mod cell;
mod ods;
pub mod reference;
mod sheet;
mod xlsx;

pub use ods::OdsError;

use crate::error::SourceError;
use crate::spreadsheet::ods::OdsSpreadsheet;
use crate::spreadsheet::xlsx::XlsxSpreadsheet;
use crate::table::Grid;
use std::path::Path;
use thiserror::Error;

/// Errors raised while locating or decoding workbook parts.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Unsupported workbook format '{0}', expected .xlsx, .xlsm, .xlam or .ods")]
    UnsupportedFormatError(String),

    #[error("Worksheet named '{sheet}' not found in '{file}'")]
    SheetNotFoundError { file: String, sheet: String },

    #[error("Missing workbook part '{0}'")]
    FileError(String),

    #[error("'{0}' is password protected")]
    SpreadsheetPasswordProtectedError(String),

    #[error("'{0}' is an encrypted or legacy binary workbook")]
    CompoundFileError(String),

    #[error("'{0}' contains no worksheets")]
    SpreadsheetEmptyError(String),

    #[error("Shared string index {0} is out of range")]
    SharedStringIndexError(usize),

    #[error("Date serial {0} is out of range")]
    DateSerialError(f64),
}

/// A workbook opened for reading.
pub(crate) trait Spreadsheet {
    /// Worksheet names in workbook order.
    fn sheet_names(&mut self) -> Result<Vec<String>, SourceError>;

    /// Reads one worksheet into a grid anchored at `A1`.
    fn read_sheet(&mut self, sheet_name: &str) -> Result<Grid, SourceError>;
}

/// Opens a workbook, choosing the reader by file extension.
pub(crate) fn open_spreadsheet(path: &Path) -> Result<Box<dyn Spreadsheet>, SourceError> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match extension.as_str() {
        "xlsx" | "xlsm" | "xlam" => Ok(Box::new(XlsxSpreadsheet::open(path)?)),
        "ods" => Ok(Box::new(OdsSpreadsheet::open(path)?)),
        _ => Err(SpreadsheetError::UnsupportedFormatError(path.display().to_string()))?,
    }
}
