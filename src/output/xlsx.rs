use crate::output::{EncodeError, Encoder, OutputFormat};
use crate::table::{CellValue, TableView};
use log::debug;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};

/// Sheet name used when one table fills a whole workbook.
const SINGLE_SHEET_NAME: &str = "Sheet1";

/// Writes each table as a one-sheet Excel workbook.
pub(crate) struct XlsxEncoder;

impl Encoder for XlsxEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Xlsx
    }

    fn encode(&self, table: TableView<'_>, path: &Path) -> Result<(), EncodeError> {
        let mut writer = WorkbookWriter::new(path);
        writer.add_sheet(SINGLE_SHEET_NAME, table)?;
        writer.close()
    }
}

/// Workbook built sheet by sheet and saved once.
///
/// The workbook lives in memory until [`Self::close`] writes it to disk.
pub struct WorkbookWriter {
    path: PathBuf,
    workbook: Workbook,
    sheet_count: usize,
    closed: bool,
}

impl WorkbookWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            workbook: Workbook::new(),
            sheet_count: 0,
            closed: false,
        }
    }

    pub fn sheet_count(&self) -> usize {
        self.sheet_count
    }

    /// Appends a sheet holding the column names followed by the rows.
    pub fn add_sheet(&mut self, name: &str, table: TableView<'_>) -> Result<(), EncodeError> {
        if self.closed {
            return Err(EncodeError::WorkbookClosed);
        }
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(name)?;
        write_table(worksheet, table)?;
        self.sheet_count += 1;
        debug!(
            "Added sheet {} with {} row(s) to {}",
            name,
            table.row_count(),
            self.path.display()
        );
        Ok(())
    }

    /// Saves the workbook. Later calls do nothing.
    pub fn close(&mut self) -> Result<(), EncodeError> {
        if self.closed {
            return Ok(());
        }
        self.workbook.save(&self.path)?;
        self.closed = true;
        debug!("Saved {} sheet(s) to {}", self.sheet_count, self.path.display());
        Ok(())
    }
}

fn write_table(worksheet: &mut Worksheet, table: TableView<'_>) -> Result<(), EncodeError> {
    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string(0, cast_col_num(col)?, name)?;
    }
    for (index, record) in table.rows().iter().enumerate() {
        let row = cast_row_num(index + 1)?;
        for (col, cell) in record.iter().enumerate() {
            let col = cast_col_num(col)?;
            match cell {
                CellValue::Empty => (),
                CellValue::Text(text) => {
                    worksheet.write_string(row, col, text)?;
                }
                CellValue::Number(number) => {
                    worksheet.write_number(row, col, *number)?;
                }
            }
        }
    }
    Ok(())
}

fn cast_row_num(value: usize) -> Result<u32, XlsxError> {
    u32::try_from(value).map_err(|_| XlsxError::RowColumnLimitError)
}

fn cast_col_num(value: usize) -> Result<u16, XlsxError> {
    u16::try_from(value).map_err(|_| XlsxError::RowColumnLimitError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{list_sheets, read_sheet};
    use crate::table::Table;

    fn table() -> Table {
        Table::new(
            vec!["id".to_owned(), "name".to_owned()],
            vec![
                vec![1.0.into(), "Ann".into()],
                vec![2.0.into(), CellValue::Empty],
            ],
        )
    }

    #[test]
    fn writes_header_then_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        XlsxEncoder.encode(table().view(), &path).unwrap();

        assert_eq!(list_sheets(&path).unwrap(), ["Sheet1"]);
        let grid = read_sheet(&path, "Sheet1").unwrap();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.rows()[0], vec![CellValue::from("id"), "name".into()]);
        assert_eq!(grid.rows()[1], vec![1.0.into(), "Ann".into()]);
        assert_eq!(grid.rows()[2], vec![2.0.into(), CellValue::Empty]);
    }

    #[test]
    fn workbook_writer_saves_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        let table = table();
        let mut writer = WorkbookWriter::new(&path);
        writer.add_sheet("Sheet1", table.view()).unwrap();
        writer.add_sheet("Sheet2", table.view()).unwrap();
        assert!(!path.exists());

        writer.close().unwrap();
        writer.close().unwrap();
        assert_eq!(writer.sheet_count(), 2);
        assert_eq!(list_sheets(&path).unwrap(), ["Sheet1", "Sheet2"]);
        assert!(matches!(
            writer.add_sheet("Sheet3", table.view()),
            Err(EncodeError::WorkbookClosed)
        ));
    }

    #[test]
    fn header_only_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        let table = Table::new(vec!["a".to_owned()], Vec::new());
        XlsxEncoder.encode(table.view(), &path).unwrap();
        let grid = read_sheet(&path, "Sheet1").unwrap();
        assert_eq!(grid.rows(), [vec![CellValue::from("a")]]);
    }
}
