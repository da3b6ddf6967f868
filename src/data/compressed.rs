//! Compressed sparse row (CSR) double matrix.

use crate::data::matrix::{CopyRow, NamedMatrix, SameFamily};
use crate::data::names::NameIndex;
use crate::error::{MatrixError, Result};
use sprs::{CsMat, TriMat};

/// A sparse matrix of `f64` in CSR format.
///
/// Cells that are not stored read as `0.0`. Missing values are stored NaNs,
/// exactly as in [`DenseMatrix`](crate::data::DenseMatrix), so an unstored
/// cell is never missing.
#[derive(Debug, Clone)]
pub struct CompressedSparseMatrix {
    data: CsMat<f64>,
    names: NameIndex,
}

impl CompressedSparseMatrix {
    /// Empty matrix of the given shape.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self::from_csr(CsMat::zero((rows, columns)))
    }

    /// Wrap an existing CSR matrix. CSC input is converted.
    pub fn from_csr(data: CsMat<f64>) -> Self {
        let data = if data.is_csr() { data } else { data.to_csr() };
        Self {
            data,
            names: NameIndex::new(),
        }
    }

    /// Build from `(row, col, value)` triplets. Repeated positions are summed.
    pub fn from_triplets(
        rows: usize,
        columns: usize,
        triplets: &[(usize, usize, f64)],
    ) -> Result<Self> {
        let mut tri_mat = TriMat::new((rows, columns));
        for &(row, col, val) in triplets {
            if row >= rows || col >= columns {
                return Err(MatrixError::IndexOutOfBounds {
                    row,
                    col,
                    rows,
                    cols: columns,
                });
            }
            tri_mat.add_triplet(row, col, val);
        }
        Ok(Self::from_csr(tri_mat.to_csr()))
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.nnz()
    }

    /// The underlying sparse matrix.
    #[inline]
    pub fn data(&self) -> &CsMat<f64> {
        &self.data
    }
}

impl NamedMatrix for CompressedSparseMatrix {
    type Value = f64;

    fn names(&self) -> &NameIndex {
        &self.names
    }

    fn names_mut(&mut self) -> &mut NameIndex {
        &mut self.names
    }

    #[inline]
    fn rows(&self) -> usize {
        self.data.rows()
    }

    #[inline]
    fn columns(&self) -> usize {
        self.data.cols()
    }

    #[inline]
    fn get_quick(&self, row: usize, col: usize) -> f64 {
        self.data.get(row, col).copied().unwrap_or(0.0)
    }

    /// Overwrites a stored entry in place; inserting a new one shifts the
    /// rest of the storage. Zero is only written over an existing entry.
    fn set_quick(&mut self, row: usize, col: usize, value: f64) {
        if let Some(stored) = self.data.get_mut(row, col) {
            *stored = value;
        } else if value != 0.0 {
            self.data.insert(row, col, value);
        }
    }

    fn is_missing(&self, row: usize, col: usize) -> bool {
        self.get_quick(row, col).is_nan()
    }

    fn row_obj(&self, row: usize) -> Vec<f64> {
        self.row_copy(row)
    }
}

impl CopyRow for CompressedSparseMatrix {
    fn row_copy(&self, row: usize) -> Vec<f64> {
        let mut dense = vec![0.0; self.columns()];
        if let Some(row_vec) = self.data.outer_view(row) {
            for (col, &val) in row_vec.iter() {
                dense[col] = val;
            }
        }
        dense
    }
}

impl SameFamily for CompressedSparseMatrix {
    fn empty_like(&self, rows: usize, columns: usize) -> Self {
        Self::new(rows, columns)
    }
}
