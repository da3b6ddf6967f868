//! Row-major double matrix that lends its rows out in place.

use crate::data::matrix::{BorrowRow, NamedMatrix, SameFamily};
use crate::data::names::NameIndex;
use crate::error::{MatrixError, Result};

/// A dense matrix stored as one buffer per row.
///
/// Intended for code that touches whole rows repeatedly. [`BorrowRow::row`]
/// returns the live backing buffer and [`BorrowRow::row_mut`] writes straight
/// into the matrix; nothing is copied.
#[derive(Debug, Clone, PartialEq)]
pub struct FastRowMatrix {
    data: Vec<Vec<f64>>,
    n_cols: usize,
    names: NameIndex,
}

impl FastRowMatrix {
    /// Zero-filled matrix without names.
    pub fn zeros(rows: usize, columns: usize) -> Self {
        Self {
            data: vec![vec![0.0; columns]; rows],
            n_cols: columns,
            names: NameIndex::new(),
        }
    }

    /// Take ownership of row buffers. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|row| row.len() != n_cols) {
            return Err(MatrixError::DimensionMismatch {
                expected: n_cols,
                actual: bad.len(),
            });
        }
        Ok(Self {
            data: rows,
            n_cols,
            names: NameIndex::new(),
        })
    }
}

impl NamedMatrix for FastRowMatrix {
    type Value = f64;

    fn names(&self) -> &NameIndex {
        &self.names
    }

    fn names_mut(&mut self) -> &mut NameIndex {
        &mut self.names
    }

    fn rows(&self) -> usize {
        self.data.len()
    }

    fn columns(&self) -> usize {
        self.n_cols
    }

    #[inline]
    fn get_quick(&self, row: usize, col: usize) -> f64 {
        self.data[row][col]
    }

    #[inline]
    fn set_quick(&mut self, row: usize, col: usize, value: f64) {
        self.data[row][col] = value;
    }

    fn is_missing(&self, row: usize, col: usize) -> bool {
        self.data[row][col].is_nan()
    }

    fn row_obj(&self, row: usize) -> Vec<f64> {
        self.data[row].clone()
    }
}

impl BorrowRow for FastRowMatrix {
    #[inline]
    fn row(&self, row: usize) -> &[f64] {
        &self.data[row]
    }

    #[inline]
    fn row_mut(&mut self, row: usize) -> &mut [f64] {
        &mut self.data[row]
    }
}

impl SameFamily for FastRowMatrix {
    fn empty_like(&self, rows: usize, columns: usize) -> Self {
        Self::zeros(rows, columns)
    }
}
