//! Ragged sparse matrix: one independent sparse vector per row.

use crate::data::matrix::{CopyRow, NamedMatrix, SameFamily};
use crate::data::names::NameIndex;
use crate::data::sparse_vector::SparseVector;
use crate::error::{MatrixError, Result};
use std::cell::Cell;

/// Column count computed at a given mutation generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnCount {
    generation: u64,
    columns: usize,
}

/// A sparse matrix whose rows each carry their own set of columns.
///
/// There is no stored column count: [`columns`](NamedMatrix::columns) is the
/// largest stored column index plus one, computed on demand and cached until
/// the next mutation. Unstored cells read as `0.0` and are not missing; only
/// a stored NaN is.
#[derive(Debug, Clone)]
pub struct RaggedMatrix {
    data: Vec<SparseVector>,
    names: NameIndex,
    /// Bumped by every mutation.
    generation: u64,
    column_cache: Cell<Option<ColumnCount>>,
    /// Reused by `materialize_row`.
    row_buffer: Vec<f64>,
}

impl Default for RaggedMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl RaggedMatrix {
    /// Empty matrix with no rows.
    pub fn new() -> Self {
        Self::with_rows(0)
    }

    /// Matrix with `rows` empty rows.
    pub fn with_rows(rows: usize) -> Self {
        Self {
            data: vec![SparseVector::new(); rows],
            names: NameIndex::new(),
            generation: 0,
            column_cache: Cell::new(None),
            row_buffer: Vec::new(),
        }
    }

    /// Append a named row.
    pub fn add_row(&mut self, name: &str, row: SparseVector) {
        self.data.push(row);
        let index = self.data.len() - 1;
        self.names.add_row_name_at(name, index);
        self.touch();
    }

    /// Append a named row given densely; zeros are not stored.
    pub fn add_dense_row(&mut self, name: &str, row: &[f64]) {
        self.add_row(name, SparseVector::from_dense(row));
    }

    /// Stored entries of a row.
    pub fn row(&self, row: usize) -> &SparseVector {
        &self.data[row]
    }

    /// Whether the cached column count is out of date.
    pub fn is_dirty(&self) -> bool {
        self.column_cache
            .get()
            .map_or(true, |cached| cached.generation != self.generation)
    }

    /// Dense view of a row, `columns()` wide.
    ///
    /// The view lives in a buffer owned by the matrix and is overwritten by
    /// the next call, so it cannot be held across calls. Use
    /// [`materialize_row_copy`](Self::materialize_row_copy) to keep a row.
    pub fn materialize_row(&mut self, row: usize) -> &[f64] {
        let width = self.columns();
        self.row_buffer.clear();
        self.row_buffer.resize(width, 0.0);
        self.data[row].scatter_into(&mut self.row_buffer);
        &self.row_buffer
    }

    /// Dense, owned copy of a row, `columns()` wide.
    pub fn materialize_row_copy(&self, row: usize) -> Vec<f64> {
        self.data[row].to_dense(self.columns())
    }

    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn compute_columns(&self) -> usize {
        self.data
            .iter()
            .filter_map(SparseVector::max_index)
            .max()
            .map_or(0, |max| max + 1)
    }
}

impl NamedMatrix for RaggedMatrix {
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

    /// Largest stored column index plus one. Rescans every row when the
    /// cache is stale.
    fn columns(&self) -> usize {
        match self.column_cache.get() {
            Some(cached) if cached.generation == self.generation => cached.columns,
            _ => {
                let columns = self.compute_columns();
                self.column_cache.set(Some(ColumnCount {
                    generation: self.generation,
                    columns,
                }));
                columns
            }
        }
    }

    #[inline]
    fn get_quick(&self, row: usize, col: usize) -> f64 {
        self.data[row].get(col)
    }

    /// O(stored entries in the row). Avoid in hot loops; build rows with
    /// [`add_row`](RaggedMatrix::add_row) instead.
    fn set_quick(&mut self, row: usize, col: usize, value: f64) {
        self.data[row].set(col, value);
        self.touch();
    }

    /// Only the row is bounds-checked; columns grow on demand.
    fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        if row >= self.rows() {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.columns(),
            });
        }
        self.set_quick(row, col, value);
        Ok(())
    }

    fn is_missing(&self, row: usize, col: usize) -> bool {
        self.data[row].get(col).is_nan()
    }
}

impl CopyRow for RaggedMatrix {
    fn row_copy(&self, row: usize) -> Vec<f64> {
        self.materialize_row_copy(row)
    }
}

impl SameFamily for RaggedMatrix {
    fn empty_like(&self, rows: usize, _columns: usize) -> Self {
        Self::with_rows(rows)
    }
}
