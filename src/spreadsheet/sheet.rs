use crate::error::SourceError;
use crate::spreadsheet::cell::Cell;
use crate::table::{CellValue, Grid};

/// Populated cells of one worksheet, collected while streaming its XML.
pub(crate) struct Sheet {
    pub(crate) name: String,
    pub(crate) cells: Vec<Cell>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
            row_upper_bound: None,
            col_upper_bound: None,
        }
    }

    pub(super) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_upper_bound.map(|upper| upper < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_upper_bound.map(|upper| upper < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Lays the cells out on a grid anchored at `A1` and sized to the last
    /// populated row and column.
    pub(crate) fn into_grid(self, shared_strings: &[String]) -> Result<Grid, SourceError> {
        let (rows, cols) = match self.row_upper_bound.zip(self.col_upper_bound) {
            Some((row, col)) => (row + 1, col + 1),
            None => return Ok(Grid::default()),
        };
        let mut table = vec![vec![CellValue::Empty; cols]; rows];
        for cell in &self.cells {
            table[cell.row][cell.col] = cell.to_value(shared_strings)?;
        }
        Ok(Grid::from_rows(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::CellType;

    fn push(sheet: &mut Sheet, row: usize, col: usize, value: &str) {
        sheet.push(Cell {
            row,
            col,
            kind: CellType::InlineString,
            value: value.to_owned(),
        });
    }

    #[test]
    fn sheet_initial() {
        let sheet = Sheet::new("Data");
        assert!(sheet.cells.is_empty());
        assert_eq!(sheet.row_upper_bound, None);
        assert_eq!(sheet.col_upper_bound, None);
        assert!(sheet.into_grid(&[]).unwrap().is_empty());
    }

    #[test]
    fn sheet_update() {
        let mut sheet = Sheet::new("Data");
        push(&mut sheet, 1, 1, "b2");
        push(&mut sheet, 1, 3, "d2");
        push(&mut sheet, 3, 2, "c4");

        assert_eq!(sheet.cells.len(), 3);
        assert_eq!(sheet.row_upper_bound, Some(3));
        assert_eq!(sheet.col_upper_bound, Some(3));
    }

    #[test]
    fn grid_is_anchored_at_a1() {
        let mut sheet = Sheet::new("Data");
        push(&mut sheet, 1, 1, "b2");
        push(&mut sheet, 2, 0, "a3");

        let grid = sheet.into_grid(&[]).unwrap();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.get(0, 0), Some(&CellValue::Empty));
        assert_eq!(grid.get(1, 1), Some(&CellValue::from("b2")));
        assert_eq!(grid.get(2, 0), Some(&CellValue::from("a3")));
    }
}
