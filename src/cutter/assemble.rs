use crate::cutter::MAX_ROWS_PER_SHEET;
use crate::error::{CutterError, Result};
use crate::output::naming::assembled_sheet_name;
use crate::output::{EncodeError, WorkbookWriter};
use crate::source;
use crate::table::chunk::{chunk, Chunk};
use crate::table::Table;
use std::fs;
use std::path::{Path, PathBuf};

/// Inputs of one assemble run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembleRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_per_sheet: i64,
}

impl AssembleRequest {
    /// Fills each sheet up to the worksheet row limit.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            rows_per_sheet: MAX_ROWS_PER_SHEET,
        }
    }

    pub fn with_rows_per_sheet(mut self, rows_per_sheet: i64) -> Self {
        self.rows_per_sheet = rows_per_sheet;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembleReport {
    pub sheets_written: usize,
    pub output: PathBuf,
}

/// Reads a CSV or JSON table and saves it as one workbook, one chunk per sheet.
pub fn assemble(request: &AssembleRequest) -> Result<AssembleReport> {
    let rows_per_sheet = sheet_capacity(request.rows_per_sheet)?;
    let table = source::read_table(&request.input)?;
    assemble_table(&table, rows_per_sheet, &request.output)
}

/// Writes `table` to `output` as sheets `Sheet1`, `Sheet2`, ... of at most
/// `rows_per_sheet` data rows each.
pub fn assemble_table(table: &Table, rows_per_sheet: i64, output: &Path) -> Result<AssembleReport> {
    let rows_per_sheet = sheet_capacity(rows_per_sheet)?;
    if table.is_empty() || table.columns().is_empty() {
        return Err(CutterError::EmptyResult(
            "The selected file has no rows to export.".to_owned(),
        ));
    }

    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(EncodeError::from)?;
    }
    let mut writer = WorkbookWriter::new(output);
    for Chunk { number, view } in chunk(table, rows_per_sheet)? {
        if !view.is_empty() {
            writer.add_sheet(&assembled_sheet_name(number), view)?;
        }
    }
    writer.close()?;
    Ok(AssembleReport {
        sheets_written: writer.sheet_count(),
        output: output.to_path_buf(),
    })
}

/// Rejects non-positive sizes and caps the rest at what one worksheet holds.
fn sheet_capacity(rows_per_sheet: i64) -> Result<i64> {
    if rows_per_sheet <= 0 {
        return Err(CutterError::InvalidChunkSize(rows_per_sheet));
    }
    Ok(rows_per_sheet.min(MAX_ROWS_PER_SHEET))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CellValue;

    fn write_csv(dir: &Path, rows: usize) -> PathBuf {
        let path = dir.join("people.csv");
        let mut text = String::from("id,name\n");
        for id in 1..=rows {
            text.push_str(&format!("{id},person {id}\n"));
        }
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn one_sheet_per_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), 5);
        let output = dir.path().join("nested").join("people.xlsx");
        let request = AssembleRequest::new(&input, &output).with_rows_per_sheet(2);

        let report = assemble(&request).unwrap();
        assert_eq!(report.sheets_written, 3);
        assert_eq!(report.output, output);
        assert_eq!(source::list_sheets(&output).unwrap(), ["Sheet1", "Sheet2", "Sheet3"]);

        let last = source::read_sheet(&output, "Sheet3").unwrap();
        assert_eq!(
            last.rows(),
            [
                vec![CellValue::from("id"), "name".into()],
                vec![CellValue::from(5.0), "person 5".into()],
            ]
        );
    }

    #[test]
    fn defaults_to_a_single_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), 3);
        let output = dir.path().join("people.xlsx");

        let report = assemble(&AssembleRequest::new(&input, &output)).unwrap();
        assert_eq!(report.sheets_written, 1);
        assert_eq!(source::read_sheet(&output, "Sheet1").unwrap().row_count(), 4);
    }

    #[test]
    fn clamps_to_the_sheet_limit() {
        assert_eq!(sheet_capacity(i64::MAX).unwrap(), MAX_ROWS_PER_SHEET);
        assert_eq!(sheet_capacity(MAX_ROWS_PER_SHEET + 1).unwrap(), 1_048_575);
        assert_eq!(sheet_capacity(7).unwrap(), 7);
        assert!(matches!(sheet_capacity(0), Err(CutterError::InvalidChunkSize(0))));
        assert!(matches!(sheet_capacity(-3), Err(CutterError::InvalidChunkSize(-3))));
    }

    #[test]
    fn rejects_a_table_without_rows() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_csv(dir.path(), 0);
        let output = dir.path().join("people.xlsx");

        let error = assemble(&AssembleRequest::new(&input, &output)).unwrap_err();
        assert!(matches!(error, CutterError::EmptyResult(_)));
        assert!(!output.exists());
    }

    #[test]
    fn rejects_records_without_keys() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("blank.json");
        fs::write(&input, "[{}, {}]").unwrap();
        let output = dir.path().join("blank.xlsx");

        let error = assemble(&AssembleRequest::new(&input, &output)).unwrap_err();
        assert!(matches!(error, CutterError::EmptyResult(_)), "{error:?}");
        assert!(!output.exists());
    }

    #[test]
    fn assembles_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("records.json");
        fs::write(&input, r#"[{"city": "Oslo", "pop": 709000}, {"city": "Bergen", "pop": null}]"#).unwrap();
        let output = dir.path().join("records.xlsx");

        assemble(&AssembleRequest::new(&input, &output).with_rows_per_sheet(1)).unwrap();
        let second = source::read_sheet(&output, "Sheet2").unwrap();
        assert_eq!(
            second.rows(),
            [
                vec![CellValue::from("city"), "pop".into()],
                vec![CellValue::from("Bergen"), CellValue::Empty],
            ]
        );
    }

    #[test]
    fn unsupported_input_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("table.txt");
        fs::write(&input, "a\n1\n").unwrap();

        let error = assemble(&AssembleRequest::new(&input, dir.path().join("out.xlsx"))).unwrap_err();
        assert!(matches!(error, CutterError::SourceRead(_)));
        assert_eq!(error.category(), "Read error");
    }
}
