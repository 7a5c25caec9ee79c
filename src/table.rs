use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

/// A scraped results table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingsTable {
    /// Column names, from the `th` cells of the first row.
    pub headers: Vec<String>,
    /// Each following row's `td` cells. Lengths are whatever the page rendered
    /// and are not checked against `headers` until a `Frame` is built.
    pub rows: Vec<Vec<String>>,
}

/// Raised when a table cannot be viewed as uniform records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("row {row} has {found} cells but there are {expected} columns")]
    ColumnMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("column name {name:?} appears more than once")]
    DuplicateColumn { name: String },
}

impl RatingsTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// True when there is nothing worth exporting.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }

    /// Validate that every row has exactly one cell per header.
    pub fn frame(&self) -> Result<Frame<'_>, ShapeError> {
        let expected = self.headers.len();
        if let Some((row, cells)) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != expected)
        {
            return Err(ShapeError::ColumnMismatch {
                row,
                expected,
                found: cells.len(),
            });
        }
        Ok(Frame {
            columns: &self.headers,
            rows: &self.rows,
        })
    }
}

/// Rectangular view over a `RatingsTable`.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    columns: &'a [String],
    rows: &'a [Vec<String>],
}

impl<'a> Frame<'a> {
    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    pub fn rows(&self) -> &'a [Vec<String>] {
        self.rows
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Fails on the first repeated column name.
    pub fn ensure_unique_columns(&self) -> Result<(), ShapeError> {
        let mut seen = HashSet::with_capacity(self.columns.len());
        for name in self.columns {
            if !seen.insert(name.as_str()) {
                return Err(ShapeError::DuplicateColumn { name: name.clone() });
            }
        }
        Ok(())
    }

    /// One column-ordered record per row.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|cells| {
                self.columns
                    .iter()
                    .zip(cells)
                    .map(|(name, cell)| (name.clone(), Value::String(cell.clone())))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn sample_table() -> RatingsTable {
    let s = |v: &[&str]| v.iter().map(|c| c.to_string()).collect::<Vec<_>>();
    RatingsTable::new(
        s(&["Rank", "Station", "Rating"]),
        vec![s(&["1", "WXYZ", "5.2"]), s(&["2", "WABC", "4.9"])],
    )
}
