use crate::error::SourceError;
use crate::source::TableError;
use crate::table::{CellValue, Table};
use log::debug;
use serde_json::Map;
use serde_json::Value;
use std::collections::HashMap;
use std::io::BufReader;
use std::path::Path;

pub(super) fn read(path: &Path) -> Result<Table, SourceError> {
    let file = std::fs::File::open(path)?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;
    let table = from_value(value)?;
    debug!(
        "Read {} record(s) x {} column(s) from {}",
        table.row_count(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Accepts `[{"col": v, ...}, ...]` or `{"col": {"0": v, ...}, ...}`.
fn from_value(value: Value) -> Result<Table, SourceError> {
    match value {
        Value::Array(records) => from_records(records),
        Value::Object(columns) => from_columns(columns),
        other => Err(TableError::InvalidJsonShape(kind(&other).to_owned()))?,
    }
}

fn from_records(records: Vec<Value>) -> Result<Table, SourceError> {
    let records = records
        .into_iter()
        .map(|record| match record {
            Value::Object(fields) => Ok(fields),
            other => Err(TableError::InvalidJsonShape(format!("an array of {}", kind(&other)))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns = Vec::<String>::new();
    let mut positions = HashMap::<String, usize>::new();
    for key in records.iter().flat_map(Map::keys) {
        if !positions.contains_key(key) {
            positions.insert(key.to_owned(), columns.len());
            columns.push(key.to_owned());
        }
    }

    let rows = records
        .into_iter()
        .map(|fields| {
            let mut row = vec![CellValue::Empty; columns.len()];
            for (key, value) in fields {
                row[positions[&key]] = to_cell(value);
            }
            row
        })
        .collect();
    Ok(Table::new(columns, rows))
}

fn from_columns(fields: Map<String, Value>) -> Result<Table, SourceError> {
    let mut columns = Vec::<String>::new();
    let mut cells = Vec::<Vec<(String, Value)>>::new();
    for (name, column) in fields {
        let entries = match column {
            Value::Object(entries) => entries.into_iter().collect(),
            Value::Array(values) => values
                .into_iter()
                .enumerate()
                .map(|(index, value)| (index.to_string(), value))
                .collect(),
            other => Err(TableError::InvalidJsonShape(format!("an object of {}", kind(&other))))?,
        };
        columns.push(name);
        cells.push(entries);
    }

    let mut index = HashMap::<String, usize>::new();
    let mut rows = Vec::<Vec<CellValue>>::new();
    for (col, entries) in cells.into_iter().enumerate() {
        for (label, value) in entries {
            let row = *index.entry(label).or_insert_with(|| {
                rows.push(vec![CellValue::Empty; columns.len()]);
                rows.len() - 1
            });
            rows[row][col] = to_cell(value);
        }
    }
    Ok(Table::new(columns, rows))
}

fn to_cell(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::String(text) => CellValue::Text(text),
        Value::Number(number) => match number.as_f64() {
            Some(number) => CellValue::Number(number),
            None => CellValue::Text(number.to_string()),
        },
        other => CellValue::Text(other.to_string()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_keep_first_seen_key_order() {
        let table = from_value(json!([
            {"name": "Ann", "id": 1, "note": null},
            {"id": 2, "name": "Bob", "extra": true},
        ]))
        .unwrap();
        assert_eq!(table.columns(), ["name", "id", "note", "extra"]);
        assert_eq!(
            table.rows()[0],
            vec!["Ann".into(), 1.0.into(), CellValue::Empty, CellValue::Empty]
        );
        assert_eq!(
            table.rows()[1],
            vec!["Bob".into(), 2.0.into(), CellValue::Empty, "true".into()]
        );
    }

    #[test]
    fn column_objects_align_by_index_label() {
        let table = from_value(json!({
            "id": {"0": 1, "1": 2, "2": 3},
            "name": {"0": "a", "2": "c"},
        }))
        .unwrap();
        assert_eq!(table.columns(), ["id", "name"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows()[1], vec![2.0.into(), CellValue::Empty]);
        assert_eq!(table.rows()[2], vec![3.0.into(), "c".into()]);
    }

    #[test]
    fn column_arrays_are_positional() {
        let table = from_value(json!({"x": [1, 2], "y": ["a"]})).unwrap();
        assert_eq!(table.rows()[0], vec![1.0.into(), "a".into()]);
        assert_eq!(table.rows()[1], vec![2.0.into(), CellValue::Empty]);
    }

    #[test]
    fn empty_array_is_empty_table() {
        assert!(from_value(json!([])).unwrap().is_empty());
    }

    #[test]
    fn rejects_other_shapes() {
        for value in [json!(5), json!("text"), json!([1, 2]), json!({"a": 1})] {
            let error = from_value(value).unwrap_err();
            assert!(matches!(
                error,
                SourceError::TableError(TableError::InvalidJsonShape(_))
            ));
        }
    }

    #[test]
    fn nested_values_become_json_text() {
        let table = from_value(json!([{"tags": ["a", "b"]}])).unwrap();
        assert_eq!(table.rows()[0][0], CellValue::from(r#"["a","b"]"#));
    }
}
