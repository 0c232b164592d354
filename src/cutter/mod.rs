//! Split and assemble operations, and the request values that configure them.

mod assemble;
mod split;

pub use assemble::{assemble, assemble_table, AssembleReport, AssembleRequest};
pub use split::{split, split_grid, SplitReport, SplitRequest};

/// Rows per split file when the caller does not choose.
pub const DEFAULT_ROWS_PER_FILE: i64 = 50_000;

/// Row limit of one Excel worksheet, header included.
pub const MAX_EXCEL_ROWS: i64 = 1_048_576;

/// Data rows that fit on one worksheet below its header row.
pub const MAX_ROWS_PER_SHEET: i64 = MAX_EXCEL_ROWS - 1;

/// Top-left cell of the default split range.
pub const DEFAULT_START_CELL: &str = "A1";
