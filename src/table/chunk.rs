use crate::error::CutterError;
use crate::table::{Table, TableView};

/// One run of consecutive rows, numbered from 1.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Chunk<'a> {
    pub number: usize,
    pub view: TableView<'a>,
}

/// Iterator over the chunks of a table, in row order.
#[derive(Clone, Debug)]
pub struct Chunks<'a> {
    table: &'a Table,
    size: usize,
    next: usize,
    remaining: usize,
}

/// Splits `table` into consecutive runs of at most `rows_per_chunk` rows.
///
/// Every chunk carries all columns. A table without rows still yields a single
/// empty chunk so callers always produce at least one artifact.
pub fn chunk(table: &Table, rows_per_chunk: i64) -> Result<Chunks<'_>, CutterError> {
    let size = usize::try_from(rows_per_chunk)
        .ok()
        .filter(|size| *size > 0)
        .ok_or(CutterError::InvalidChunkSize(rows_per_chunk))?;
    let remaining = table.row_count().div_ceil(size).max(1);
    Ok(Chunks {
        table,
        size,
        next: 0,
        remaining,
    })
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let rows = self.table.rows();
        let start = (self.next * self.size).min(rows.len());
        let end = start.saturating_add(self.size).min(rows.len());
        self.next += 1;
        self.remaining -= 1;
        Some(Chunk {
            number: self.next,
            view: TableView::new(self.table.columns(), &rows[start..end]),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Chunks<'_> {}
