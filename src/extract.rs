use crate::types::{RawFieldPair, TableRow};
use tracing::warn;

/// Why a table row could not be turned into a label/value pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedRow {
    CellCount(usize),
    NoLabel,
    TwoLabels,
    EmptyLabel,
}

/// Lazily turns table rows into label/value pairs.
///
/// The label cell is the one whose trimmed text ends with the label marker. Rows
/// that do not have exactly two cells with exactly one label are skipped with a
/// warning and counted in [`FieldPairs::skipped`].
pub struct FieldPairs<I> {
    rows: I,
    marker: String,
    position: usize,
    skipped: usize,
}

impl<I> FieldPairs<I>
where
    I: Iterator<Item = TableRow>,
{
    pub fn new<R>(rows: R, marker: impl Into<String>) -> Self
    where
        R: IntoIterator<IntoIter = I>,
    {
        Self {
            rows: rows.into_iter(),
            marker: marker.into(),
            position: 0,
            skipped: 0,
        }
    }

    /// Number of rows skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn strip_label<'a>(&self, cell: &'a str) -> Option<&'a str> {
        cell.trim().strip_suffix(self.marker.as_str()).map(str::trim)
    }

    fn split_row(&self, row: &TableRow) -> Result<RawFieldPair, MalformedRow> {
        let [first, second] = row.cells.as_slice() else {
            return Err(MalformedRow::CellCount(row.cells.len()));
        };

        let (label, value) = match (self.strip_label(first), self.strip_label(second)) {
            (Some(label), None) => (label, second),
            (None, Some(label)) => (label, first),
            (None, None) => return Err(MalformedRow::NoLabel),
            (Some(_), Some(_)) => return Err(MalformedRow::TwoLabels),
        };

        if label.is_empty() {
            return Err(MalformedRow::EmptyLabel);
        }

        Ok(RawFieldPair::new(label, value.trim()))
    }
}

impl<I> Iterator for FieldPairs<I>
where
    I: Iterator<Item = TableRow>,
{
    type Item = RawFieldPair;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = self.rows.next()?;
            let index = self.position;
            self.position += 1;

            match self.split_row(&row) {
                Ok(pair) => return Some(pair),
                Err(reason) => {
                    self.skipped += 1;
                    warn!(row = index, ?reason, cells = ?row.cells, "Skipping malformed table row");
                }
            }
        }
    }
}
