//! Named matrix of arbitrary cell values.

use crate::data::matrix::{BorrowRow, NamedMatrix, SameFamily};
use crate::data::names::NameIndex;
use crate::error::{MatrixError, Result};

/// A dense, row-major matrix of optional cells.
///
/// An empty cell (`None`) is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMatrix<T> {
    data: Vec<Option<T>>,
    n_rows: usize,
    n_cols: usize,
    names: NameIndex,
}

/// Matrix of string cells, e.g. presence/absence calls.
pub type StringMatrix = ObjectMatrix<String>;

impl<T: Clone> ObjectMatrix<T> {
    /// Matrix of empty cells.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            data: vec![None; rows * columns],
            n_rows: rows,
            n_cols: columns,
            names: NameIndex::new(),
        }
    }

    /// Build from rows of filled cells. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let n_cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|row| row.len() != n_cols) {
            return Err(MatrixError::DimensionMismatch {
                expected: n_cols,
                actual: bad.len(),
            });
        }
        let n_rows = rows.len();
        Ok(Self {
            data: rows.into_iter().flatten().map(Some).collect(),
            n_rows,
            n_cols,
            names: NameIndex::new(),
        })
    }

    /// Borrow a cell without cloning it.
    pub fn cell(&self, row: usize, col: usize) -> Option<&T> {
        self.data[row * self.n_cols + col].as_ref()
    }
}

impl<T: Clone> NamedMatrix for ObjectMatrix<T> {
    type Value = Option<T>;

    fn names(&self) -> &NameIndex {
        &self.names
    }

    fn names_mut(&mut self) -> &mut NameIndex {
        &mut self.names
    }

    fn rows(&self) -> usize {
        self.n_rows
    }

    fn columns(&self) -> usize {
        self.n_cols
    }

    fn get_quick(&self, row: usize, col: usize) -> Option<T> {
        self.data[row * self.n_cols + col].clone()
    }

    fn set_quick(&mut self, row: usize, col: usize, value: Option<T>) {
        self.data[row * self.n_cols + col] = value;
    }

    fn is_missing(&self, row: usize, col: usize) -> bool {
        self.data[row * self.n_cols + col].is_none()
    }
}

impl<T: Clone> BorrowRow for ObjectMatrix<T> {
    fn row(&self, row: usize) -> &[Option<T>] {
        let start = row * self.n_cols;
        &self.data[start..start + self.n_cols]
    }

    fn row_mut(&mut self, row: usize) -> &mut [Option<T>] {
        let start = row * self.n_cols;
        &mut self.data[start..start + self.n_cols]
    }
}

impl<T: Clone> SameFamily for ObjectMatrix<T> {
    fn empty_like(&self, rows: usize, columns: usize) -> Self {
        Self::new(rows, columns)
    }
}
