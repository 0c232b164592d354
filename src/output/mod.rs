//! # Output Encoders
//!
//! Serializes a [`TableView`] into one file per call: an Excel workbook, CSV,
//! a JSON array of records, or (with the `ods` feature) an OpenDocument
//! spreadsheet. Every encoder writes the column names first and keeps row order.

mod delimited;
pub mod naming;
mod ods;
mod records;
mod xlsx;

pub use xlsx::WorkbookWriter;

use crate::table::TableView;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Writer-side failures.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Cannot add sheets after the workbook was saved")]
    WorkbookClosed,

    #[error("Output format '{format}' is unavailable: {hint}")]
    DependencyUnavailable { format: String, hint: String },
}

/// File formats a table can be written as.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Xlsx,
    Csv,
    Json,
    Ods,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [Self::Xlsx, Self::Csv, Self::Json, Self::Ods];

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Ods => "ods",
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim().trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown output format '{value}', expected one of xlsx, csv, json, ods"))
    }
}

/// Writes one table to one file.
pub trait Encoder {
    fn format(&self) -> OutputFormat;

    /// Fails with [`EncodeError::DependencyUnavailable`] when this build cannot
    /// write the format, so callers can refuse before doing any work.
    fn ensure_available(&self) -> Result<(), EncodeError> {
        Ok(())
    }

    /// Creates or truncates `path` and writes `table` into it.
    fn encode(&self, table: TableView<'_>, path: &Path) -> Result<(), EncodeError>;
}

/// The encoder for `format`.
pub fn encoder_for(format: OutputFormat) -> Box<dyn Encoder> {
    match format {
        OutputFormat::Xlsx => Box::new(xlsx::XlsxEncoder),
        OutputFormat::Csv => Box::new(delimited::CsvEncoder),
        OutputFormat::Json => Box::new(records::JsonEncoder),
        OutputFormat::Ods => Box::new(ods::OdsEncoder),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_names() {
        assert_eq!("xlsx".parse::<OutputFormat>(), Ok(OutputFormat::Xlsx));
        assert_eq!(" CSV ".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!(".json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("parquet".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn encoders_match_their_format() {
        for format in OutputFormat::ALL {
            assert_eq!(encoder_for(format).format(), format);
            assert_eq!(format.to_string(), format.extension());
        }
    }
}
