use crate::output::{EncodeError, Encoder, OutputFormat};
use crate::table::{CellValue, TableView};
use log::debug;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Largest magnitude below which every integer is exactly representable in `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// JSON array with one object per row, keys in column order, indented by two spaces.
pub(crate) struct JsonEncoder;

impl Encoder for JsonEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn encode(&self, table: TableView<'_>, path: &Path) -> Result<(), EncodeError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &Records(table))?;
        writer.flush()?;
        debug!("Wrote {} record(s) to {}", table.row_count(), path.display());
        Ok(())
    }
}

struct Records<'a>(TableView<'a>);

struct Record<'a> {
    columns: &'a [String],
    cells: &'a [CellValue],
}

struct Value<'a>(&'a CellValue);

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.row_count()))?;
        for cells in self.0.rows() {
            seq.serialize_element(&Record {
                columns: self.0.columns(),
                cells,
            })?;
        }
        seq.end()
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, &Value(cell))?;
        }
        map.end()
    }
}

impl Serialize for Value<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Text(text) => serializer.serialize_str(text),
            CellValue::Number(number) if number.fract() == 0.0 && number.abs() < MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*number as i64)
            }
            CellValue::Number(number) => serializer.serialize_f64(*number),
        }
    }
}
