use crate::error::CutterError;
use crate::spreadsheet::reference::CellReference;
use crate::table::{CellValue, Grid, Table};
use std::collections::HashSet;
use std::str::FromStr;

/// Rectangular selection given by a start cell and an optional end cell.
/// A missing end reaches to the last populated row and column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Range {
    pub start: CellReference,
    pub end: Option<CellReference>,
}

impl Range {
    pub const fn new(start: CellReference, end: Option<CellReference>) -> Self {
        Self { start, end }
    }

    /// Parses separate start and end cells; a blank end means "to the last cell".
    pub fn parse(start: &str, end: Option<&str>) -> Result<Self, CutterError> {
        let start = CellReference::parse(start)?;
        let end = end
            .map(str::trim)
            .filter(|end| !end.is_empty())
            .map(CellReference::parse)
            .transpose()?;
        Ok(Self { start, end })
    }
}

impl Default for Range {
    /// Whole sheet from `A1`.
    fn default() -> Self {
        Self::new(CellReference::new(0, 0), None)
    }
}

impl FromStr for Range {
    type Err = CutterError;

    /// Parses `"B2:D10"`, `"B2:"` or `"B2"`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once(':') {
            Some((start, end)) => Self::parse(start, Some(end)),
            None => Self::parse(value, None),
        }
    }
}

/// Extracts `range` from `grid` and promotes its first row to column names.
///
/// Blank header cells are named `Column {n}` after their 1-based position in the
/// range; when two columns end up with the same name only the first is kept.
/// A range covering fewer than two rows yields an empty table.
pub fn slice(grid: &Grid, range: &Range) -> Result<Table, CutterError> {
    let start = range.start;
    if let Some(end) = range.end {
        if end.row < start.row || end.col < start.col {
            return Err(CutterError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
    }
    if start.row >= grid.row_count() || start.col >= grid.column_count() {
        return Err(CutterError::OutOfBounds {
            reference: start.to_string(),
            rows: grid.row_count(),
            columns: grid.column_count(),
        });
    }

    let last_row = grid.row_count() - 1;
    let last_col = grid.column_count() - 1;
    let (end_row, end_col) = match range.end {
        Some(end) => (end.row.min(last_row), end.col.min(last_col)),
        None => (last_row, last_col),
    };
    if end_row == start.row {
        return Ok(Table::empty());
    }

    let records = &grid.rows()[start.row..=end_row];
    let mut seen = HashSet::new();
    let (kept, columns): (Vec<usize>, Vec<String>) = records[0][start.col..=end_col]
        .iter()
        .enumerate()
        .map(|(position, cell)| (start.col + position, header_name(position, cell)))
        .filter(|(_, name)| seen.insert(name.clone()))
        .unzip();

    let rows = records[1..]
        .iter()
        .map(|record| {
            kept.iter()
                .map(|col| record.get(*col).cloned().unwrap_or_default())
                .collect()
        })
        .collect();
    Ok(Table::new(columns, rows))
}

fn header_name(position: usize, cell: &CellValue) -> String {
    let text = cell.as_text();
    let text = text.trim();
    if text.is_empty() {
        format!("Column {}", position + 1)
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Grid {
        Grid::from_rows(vec![
            vec!["ID".into(), "Name".into(), "Amount".into()],
            vec![1.0.into(), "Ann".into(), 10.5.into()],
            vec![2.0.into(), "Bob".into(), CellValue::Empty],
            vec![3.0.into(), "Cid".into(), 7.0.into()],
            vec![4.0.into(), "Dee".into(), 1.0.into()],
        ])
    }

    fn range(value: &str) -> Range {
        value.parse().unwrap()
    }

    fn names(table: &Table) -> Vec<&str> {
        table.columns().iter().map(String::as_str).collect()
    }

    #[test]
    fn whole_sheet_promotes_header() {
        let table = slice(&sheet(), &range("A1")).unwrap();
        assert_eq!(names(&table), ["ID", "Name", "Amount"]);
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.rows()[0], vec![1.0.into(), "Ann".into(), 10.5.into()]);
        assert_eq!(table.rows()[3][1], "Dee".into());
    }

    #[test]
    fn missing_end_reaches_last_cell() {
        let table = slice(&sheet(), &range("B2")).unwrap();
        assert_eq!(names(&table), ["Ann", "10.5"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.rows()[2], vec!["Dee".into(), 1.0.into()]);
    }

    #[test]
    fn single_cell_range_is_empty() {
        let table = slice(&sheet(), &range("B1:B1")).unwrap();
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
        assert!(slice(&sheet(), &range("A5")).unwrap().is_empty());
    }

    #[test]
    fn explicit_end_is_inclusive_and_clamped() {
        let table = slice(&sheet(), &range("A1:B3")).unwrap();
        assert_eq!(names(&table), ["ID", "Name"]);
        assert_eq!(table.row_count(), 2);

        let clamped = slice(&sheet(), &range("B1:Z99")).unwrap();
        assert_eq!(names(&clamped), ["Name", "Amount"]);
        assert_eq!(clamped.row_count(), 4);
        assert_eq!(clamped.rows()[1][1], CellValue::Empty);
    }

    #[test]
    fn start_outside_sheet_is_out_of_bounds() {
        let error = slice(&sheet(), &range("Z99")).unwrap_err();
        assert!(matches!(error, CutterError::OutOfBounds { rows: 5, columns: 3, .. }));
        assert!(matches!(
            slice(&sheet(), &range("D1")),
            Err(CutterError::OutOfBounds { .. })
        ));
        assert!(matches!(
            slice(&Grid::default(), &Range::default()),
            Err(CutterError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn end_before_start_is_invalid() {
        for value in ["B2:A3", "B2:C1"] {
            assert!(matches!(
                slice(&sheet(), &range(value)),
                Err(CutterError::InvalidRange { .. })
            ));
        }
    }

    #[test]
    fn blank_headers_are_numbered_by_position() {
        let grid = Grid::from_rows(vec![
            vec!["x".into(), "  ".into(), CellValue::Empty, " Total ".into()],
            vec![1.0.into(), 2.0.into(), 3.0.into(), 4.0.into()],
        ]);
        let table = slice(&grid, &range("B1")).unwrap();
        assert_eq!(names(&table), ["Column 1", "Column 2", "Total"]);
    }

    #[test]
    fn duplicate_headers_keep_first_column() {
        let grid = Grid::from_rows(vec![
            vec!["a".into(), "b".into(), "a ".into(), "c".into(), "b".into()],
            vec![1.0.into(), 2.0.into(), 3.0.into(), 4.0.into(), 5.0.into()],
        ]);
        let table = slice(&grid, &Range::default()).unwrap();
        assert_eq!(names(&table), ["a", "b", "c"]);
        assert_eq!(table.rows()[0], vec![1.0.into(), 2.0.into(), 4.0.into()]);
    }

    #[test]
    fn parses_range_forms() {
        assert_eq!(range("b2:d10").end, Some(CellReference::new(9, 3)));
        assert_eq!(range("B2:").end, None);
        assert_eq!(Range::parse("C3", Some("  ")).unwrap().end, None);
        assert!("B2:x".parse::<Range>().is_err());
    }
}
