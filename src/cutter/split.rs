use crate::cutter::DEFAULT_ROWS_PER_FILE;
use crate::error::{CutterError, Result};
use crate::output::naming::artifact_stem;
use crate::output::{encoder_for, EncodeError, Encoder, OutputFormat};
use crate::source;
use crate::table::chunk::{chunk, Chunk};
use crate::table::range::{slice, Range};
use crate::table::Grid;
use std::fs;
use std::path::PathBuf;

/// Everything one split run needs, fixed before any file is touched.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitRequest {
    pub input: PathBuf,
    pub sheet: String,
    pub range: Range,
    pub rows_per_file: i64,
    pub output_dir: PathBuf,
    pub formats: Vec<OutputFormat>,
}

impl SplitRequest {
    /// The whole sheet from `A1`, [`DEFAULT_ROWS_PER_FILE`] rows per file, xlsx only.
    pub fn new(input: impl Into<PathBuf>, sheet: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            sheet: sheet.into(),
            range: Range::default(),
            rows_per_file: DEFAULT_ROWS_PER_FILE,
            output_dir: output_dir.into(),
            formats: vec![OutputFormat::Xlsx],
        }
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = range;
        self
    }

    pub fn with_rows_per_file(mut self, rows_per_file: i64) -> Self {
        self.rows_per_file = rows_per_file;
        self
    }

    /// Repeated formats are written once.
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = OutputFormat>) -> Self {
        self.formats.clear();
        for format in formats {
            if !self.formats.contains(&format) {
                self.formats.push(format);
            }
        }
        self
    }

    /// File stem of the input, used as the prefix of every artifact.
    pub fn stem(&self) -> String {
        self.input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Rejects requests that cannot succeed regardless of the sheet contents.
    fn encoders(&self) -> Result<Vec<Box<dyn Encoder>>> {
        if self.rows_per_file <= 0 {
            return Err(CutterError::InvalidChunkSize(self.rows_per_file));
        }
        if self.formats.is_empty() {
            return Err(CutterError::NoOutputFormat);
        }
        let encoders: Vec<Box<dyn Encoder>> = self.formats.iter().map(|format| encoder_for(*format)).collect();
        for encoder in &encoders {
            encoder.ensure_available()?;
        }
        Ok(encoders)
    }
}

/// Outcome of a split run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitReport {
    pub chunks_written: usize,
    pub files: Vec<PathBuf>,
}

/// Reads the requested sheet and writes its range as chunked files.
pub fn split(request: &SplitRequest) -> Result<SplitReport> {
    let encoders = request.encoders()?;
    let grid = source::read_sheet(&request.input, &request.sheet)?;
    split_with(&grid, request, &encoders)
}

/// Same as [`split`] for a sheet that is already in memory.
///
/// Files written before a failure are left in place.
pub fn split_grid(grid: &Grid, request: &SplitRequest) -> Result<SplitReport> {
    split_with(grid, request, &request.encoders()?)
}

fn split_with(grid: &Grid, request: &SplitRequest, encoders: &[Box<dyn Encoder>]) -> Result<SplitReport> {
    let table = slice(grid, &request.range)?;
    if table.is_empty() {
        return Err(CutterError::EmptyResult(
            "The selected range does not contain data rows to split.".to_owned(),
        ));
    }
    let chunks = chunk(&table, request.rows_per_file)?;

    fs::create_dir_all(&request.output_dir).map_err(EncodeError::from)?;
    let stem = request.stem();
    let mut report = SplitReport::default();
    for Chunk { number, view } in chunks {
        if view.is_empty() {
            continue;
        }
        let name = artifact_stem(&stem, &request.sheet, number);
        for encoder in encoders {
            let path = request
                .output_dir
                .join(format!("{name}.{}", encoder.format().extension()));
            encoder.encode(view, &path)?;
            report.files.push(path);
        }
        report.chunks_written += 1;
    }
    Ok(report)
}
