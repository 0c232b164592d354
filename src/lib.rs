//! # Rusty Cutter
//!
//! Splits one worksheet into many smaller files and assembles a CSV or JSON
//! table back into a single multi-sheet workbook.
//!
//! ## Features
//!
//! - **Workbook input**: Excel (`.xlsx`, `.xlsm`, `.xlam`) and OpenDocument (`.ods`)
//!   sheets are read into memory as plain grids anchored at `A1`
//! - **Cell ranges**: select a rectangle with references such as `B2:F100`; its
//!   first row names the columns
//! - **Chunking**: data rows are partitioned in order into runs of a fixed size
//! - **Output formats**: every chunk can be written as `.xlsx`, `.csv`, `.json`
//!   and, with the `ods` feature, `.ods`
//! - **Assembling**: a `.csv` or `.json` table becomes one workbook with a sheet per
//!   chunk, never exceeding the worksheet row limit
//!
//! ## Example
//!
//! ```no_run
//! use rusty_cutter::cutter::{split, SplitRequest};
//! use rusty_cutter::output::OutputFormat;
//!
//! let request = SplitRequest::new("sales.xlsx", "Q1", "parts")
//!     .with_range("A1:D5000".parse()?)
//!     .with_rows_per_file(1_000)
//!     .with_formats([OutputFormat::Csv, OutputFormat::Json]);
//! let report = split(&request)?;
//! println!("{} chunk(s) written", report.chunks_written);
//! # Ok::<(), rusty_cutter::CutterError>(())
//! ```

pub mod cutter;
pub mod error;
pub(crate) mod helpers;
pub mod output;
pub mod source;
pub mod spreadsheet;
pub mod table;

pub use crate::cutter::{AssembleReport, AssembleRequest, SplitReport, SplitRequest};
pub use crate::error::{CutterError, SourceError};
pub use crate::helpers::xml::XmlError;
pub use crate::output::{EncodeError, OutputFormat};
pub use crate::spreadsheet::reference::CellReference;
pub use crate::table::range::Range;
