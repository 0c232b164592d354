use crate::output::{EncodeError, Encoder, OutputFormat};
use crate::table::TableView;
use log::debug;
use std::path::Path;

/// Comma separated values with a header record; empty cells are empty fields.
pub(crate) struct CsvEncoder;

impl Encoder for CsvEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Csv
    }

    fn encode(&self, table: TableView<'_>, path: &Path) -> Result<(), EncodeError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(table.columns())?;
        for record in table.rows() {
            writer.write_record(record.iter().map(|cell| cell.as_text().into_owned()))?;
        }
        writer.flush()?;
        debug!("Wrote {} row(s) to {}", table.row_count(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::read_table;
    use crate::table::{CellValue, Table};

    #[test]
    fn round_trips_through_csv_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let table = Table::new(
            vec!["id".to_owned(), "note".to_owned()],
            vec![
                vec![1.0.into(), "plain".into()],
                vec![2.5.into(), "comma, \"quoted\"".into()],
                vec![3.0.into(), CellValue::Empty],
            ],
        );
        CsvEncoder.encode(table.view(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("id,note\n1,plain\n"));
        assert_eq!(read_table(&path).unwrap(), table);
    }
}
