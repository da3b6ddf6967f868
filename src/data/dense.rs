//! Dense double matrix backed by a contiguous nalgebra buffer.

use crate::data::matrix::{CopyRow, NamedMatrix, SameFamily};
use crate::data::names::{Axis, NameIndex};
use crate::error::{MatrixError, Result};
use nalgebra::DMatrix;

/// A dense matrix of `f64` with named rows and columns.
///
/// Missing values are NaN. Rows are handed out as copies ([`CopyRow`]);
/// use [`FastRowMatrix`](crate::data::FastRowMatrix) when rows should be
/// borrowed in place.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    data: DMatrix<f64>,
    names: NameIndex,
}

impl DenseMatrix {
    /// Create a named matrix from existing data.
    ///
    /// The number of names must match the matrix shape.
    pub fn new(data: DMatrix<f64>, row_names: Vec<String>, col_names: Vec<String>) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if nrows != row_names.len() {
            return Err(MatrixError::DimensionMismatch {
                expected: nrows,
                actual: row_names.len(),
            });
        }
        if ncols != col_names.len() {
            return Err(MatrixError::DimensionMismatch {
                expected: ncols,
                actual: col_names.len(),
            });
        }
        let mut matrix = Self::from_dmatrix(data);
        matrix.names.set_names(Axis::Row, &row_names)?;
        matrix.names.set_names(Axis::Column, &col_names)?;
        Ok(matrix)
    }

    /// Zero-filled matrix without names.
    pub fn zeros(rows: usize, columns: usize) -> Self {
        Self::from_dmatrix(DMatrix::zeros(rows, columns))
    }

    /// Wrap an nalgebra matrix without names.
    pub fn from_dmatrix(data: DMatrix<f64>) -> Self {
        Self {
            data,
            names: NameIndex::new(),
        }
    }

    /// Build from row vectors. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().find(|row| row.len() != ncols) {
            return Err(MatrixError::DimensionMismatch {
                expected: ncols,
                actual: bad.len(),
            });
        }
        Ok(Self::from_dmatrix(DMatrix::from_fn(rows.len(), ncols, |r, c| {
            rows[r][c]
        })))
    }

    /// The underlying nalgebra matrix.
    #[inline]
    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Keep only the given rows, in the given order.
    pub fn subset_rows(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&row| row >= self.rows()) {
            return Err(MatrixError::InvalidArgument(format!(
                "Row index {} out of bounds",
                bad
            )));
        }
        let mut subset = Self::from_dmatrix(self.data.select_rows(indices));
        for (new_row, &old_row) in indices.iter().enumerate() {
            if let Some(name) = self.row_name(old_row) {
                subset.names.add_row_name_at(name, new_row);
            }
        }
        subset.names.copy_axis_from(Axis::Column, &self.names);
        Ok(subset)
    }

    /// Keep only the given columns, in the given order.
    pub fn subset_columns(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&col| col >= self.columns()) {
            return Err(MatrixError::InvalidArgument(format!(
                "Column index {} out of bounds",
                bad
            )));
        }
        let mut subset = Self::from_dmatrix(self.data.select_columns(indices));
        for (new_col, &old_col) in indices.iter().enumerate() {
            if let Some(name) = self.column_name(old_col) {
                subset.names.add_column_name_at(name, new_col)?;
            }
        }
        subset.names.copy_axis_from(Axis::Row, &self.names);
        Ok(subset)
    }

    /// Swap rows and columns, names included.
    pub fn transpose(&self) -> Self {
        Self {
            data: self.data.transpose(),
            names: self.names.transposed(),
        }
    }
}

impl NamedMatrix for DenseMatrix {
    type Value = f64;

    #[inline]
    fn names(&self) -> &NameIndex {
        &self.names
    }

    #[inline]
    fn names_mut(&mut self) -> &mut NameIndex {
        &mut self.names
    }

    #[inline]
    fn rows(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    fn columns(&self) -> usize {
        self.data.ncols()
    }

    #[inline]
    fn get_quick(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    #[inline]
    fn set_quick(&mut self, row: usize, col: usize, value: f64) {
        self.data[(row, col)] = value;
    }

    #[inline]
    fn is_missing(&self, row: usize, col: usize) -> bool {
        self.data[(row, col)].is_nan()
    }
}

impl CopyRow for DenseMatrix {
    fn row_copy(&self, row: usize) -> Vec<f64> {
        self.data.row(row).iter().copied().collect()
    }
}

impl SameFamily for DenseMatrix {
    fn empty_like(&self, rows: usize, columns: usize) -> Self {
        Self::zeros(rows, columns)
    }
}
