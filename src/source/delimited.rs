use crate::error::SourceError;
use crate::table::{CellValue, Table};
use log::debug;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

pub(super) fn read(path: &Path) -> Result<Table, SourceError> {
    let table = read_from(std::fs::File::open(path)?)?;
    debug!(
        "Read {} row(s) x {} column(s) from {}",
        table.row_count(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// First record names the columns; shorter records are padded and longer ones
/// truncated to the header width.
fn read_from<R: Read>(reader: R) -> Result<Table, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let columns = unique_columns(reader.headers()?.iter());
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(parse_field).collect());
    }
    Ok(Table::new(columns, rows))
}

fn parse_field(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => CellValue::Number(number),
        _ => CellValue::Text(field.to_owned()),
    }
}

/// Repeated names get a `.1`, `.2`... suffix so every column stays addressable.
fn unique_columns<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .map(|name| {
            let mut candidate = name.to_owned();
            let mut counter = 0;
            while !seen.insert(candidate.clone()) {
                counter += 1;
                candidate = format!("{name}.{counter}");
            }
            candidate
        })
        .collect()
}
