use crate::output::EncodeError;
use thiserror::Error;

/// Main error type for split and assemble operations.
/// Each variant is one category the caller is expected to report distinctly.
#[derive(Error, Debug)]
pub enum CutterError {
    /// Cell address does not look like `A1` or `BC12`
    #[error("Invalid cell reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// End cell lies above or to the left of the start cell
    #[error("End cell {end} must be below and to the right of the start cell {start}")]
    InvalidRange { start: String, end: String },

    /// Start cell lies outside the populated area of the sheet
    #[error("Start cell {reference} lies outside the populated area of the sheet ({rows} rows x {columns} columns)")]
    OutOfBounds {
        reference: String,
        rows: usize,
        columns: usize,
    },

    /// Rows per chunk must be a positive integer
    #[error("Rows per chunk must be greater than zero, got {0}")]
    InvalidChunkSize(i64),

    /// Split requested without any output format
    #[error("Please choose at least one format to export")]
    NoOutputFormat,

    /// Nothing left to write after slicing or reading
    #[error("{0}")]
    EmptyResult(String),

    /// Input file could not be read or decoded
    #[error("{0}")]
    SourceRead(#[from] SourceError),

    /// One output encoding failed
    #[error("{0}")]
    Encode(EncodeError),

    /// Optional encoder was built without its runtime support
    #[error("Output format '{format}' is unavailable: {hint}")]
    DependencyUnavailable { format: String, hint: String },
}

impl CutterError {
    /// Short user-facing heading for this kind of failure.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidReference { .. } | Self::InvalidRange { .. } | Self::OutOfBounds { .. } => {
                "Invalid range"
            }
            Self::InvalidChunkSize(_) => "Invalid rows",
            Self::NoOutputFormat => "No format",
            Self::EmptyResult(_) => "Empty table",
            Self::SourceRead(_) => "Read error",
            Self::Encode(_) => "Write error",
            Self::DependencyUnavailable { .. } => "Missing dependency",
        }
    }
}

impl From<EncodeError> for CutterError {
    fn from(error: EncodeError) -> Self {
        match error {
            EncodeError::DependencyUnavailable { format, hint } => {
                CutterError::DependencyUnavailable { format, hint }
            }
            error => CutterError::Encode(error),
        }
    }
}

/// Aggregates errors raised while reading workbooks and text tables.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{0}")]
    WithContextError(String),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("{0}")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    // Third-party library errors
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("{0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("{0}")]
    XmlEncodingError(#[from] quick_xml::encoding::EncodingError),

    #[error("{0}")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),

    #[error("{0}")]
    CsvError(#[from] csv::Error),

    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    // Helper module errors
    #[error("{0}")]
    XmlHelperError(#[from] crate::helpers::xml::XmlError),

    // Spreadsheet module errors
    #[error("{0}")]
    SpreadsheetError(#[from] crate::spreadsheet::SpreadsheetError),

    #[error("{0}")]
    OdsError(#[from] crate::spreadsheet::OdsError),

    #[error("{0}")]
    TableError(#[from] crate::source::TableError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, SourceError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| SourceError::WithContextError(format!("{}: {}", message, e)))
    }
}

/// Result type used across the crate.
pub type Result<T, E = CutterError> = std::result::Result<T, E>;
