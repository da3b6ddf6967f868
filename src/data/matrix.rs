//! The named-matrix contract shared by every storage strategy.

use crate::data::names::{Axis, NameIndex};
use crate::error::{MatrixError, Result};

/// A two-dimensional table with named rows and columns.
///
/// Implementors supply storage access (`rows`, `columns`, `get_quick`,
/// `set_quick`, `is_missing`) and their [`NameIndex`]; everything else is
/// provided on top of those.
///
/// What counts as missing depends on the storage: a NaN for the double-valued
/// matrices, an empty cell for [`ObjectMatrix`](crate::data::ObjectMatrix).
/// A value that is absent from sparse storage reads as `0.0` and is *not*
/// missing. Always ask [`is_missing`](Self::is_missing).
pub trait NamedMatrix {
    /// Cell type.
    type Value: Clone;

    fn names(&self) -> &NameIndex;

    fn names_mut(&mut self) -> &mut NameIndex;

    /// Number of rows held by the storage.
    fn rows(&self) -> usize;

    /// Number of columns held by the storage.
    fn columns(&self) -> usize;

    /// Read a cell without bounds checking against [`rows`](Self::rows) and
    /// [`columns`](Self::columns). May panic on an out-of-range index.
    fn get_quick(&self, row: usize, col: usize) -> Self::Value;

    /// Write a cell without bounds checking. May panic on an out-of-range index.
    fn set_quick(&mut self, row: usize, col: usize, value: Self::Value);

    /// Whether the cell holds no value.
    fn is_missing(&self, row: usize, col: usize) -> bool;

    /// Bounds-checked read.
    fn get(&self, row: usize, col: usize) -> Result<Self::Value> {
        self.check_bounds(row, col)?;
        Ok(self.get_quick(row, col))
    }

    /// Bounds-checked write.
    fn set(&mut self, row: usize, col: usize, value: Self::Value) -> Result<()> {
        self.check_bounds(row, col)?;
        self.set_quick(row, col, value);
        Ok(())
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        let (rows, cols) = (self.rows(), self.columns());
        if row >= rows || col >= cols {
            return Err(MatrixError::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            });
        }
        Ok(())
    }

    /// Owned copy of a row's cells, for code that works on any storage.
    fn row_obj(&self, row: usize) -> Vec<Self::Value> {
        (0..self.columns()).map(|col| self.get_quick(row, col)).collect()
    }

    /// Owned copy of a column's cells.
    fn col_obj(&self, col: usize) -> Vec<Self::Value> {
        (0..self.rows()).map(|row| self.get_quick(row, col)).collect()
    }

    /// Row cells looked up by row name.
    ///
    /// A name registered past the end of the storage is reported as out of
    /// bounds.
    fn row_by_name(&self, name: &str) -> Result<Vec<Self::Value>> {
        let row = self.row_index_by_name(name)?;
        let (rows, cols) = (self.rows(), self.columns());
        if row >= rows {
            return Err(MatrixError::IndexOutOfBounds { row, col: 0, rows, cols });
        }
        Ok(self.row_obj(row))
    }

    /// Column cells looked up by column name.
    fn column_by_name(&self, name: &str) -> Result<Vec<Self::Value>> {
        let col = self.col_index_by_name(name)?;
        let (rows, cols) = (self.rows(), self.columns());
        if col >= cols {
            return Err(MatrixError::IndexOutOfBounds { row: 0, col, rows, cols });
        }
        Ok(self.col_obj(col))
    }

    /// Count missing cells with a full scan.
    fn num_missing(&self) -> usize {
        let cols = self.columns();
        (0..self.rows())
            .map(|row| (0..cols).filter(|&col| self.is_missing(row, col)).count())
            .sum()
    }

    /// True only when every row has a name.
    fn has_row_names(&self) -> bool {
        self.names().rows().len() == self.rows()
    }

    /// True only when every column has a name.
    fn has_col_names(&self) -> bool {
        self.names().columns().len() == self.columns()
    }

    fn row_index_by_name(&self, name: &str) -> Result<usize> {
        self.names().index_of(Axis::Row, name)
    }

    fn col_index_by_name(&self, name: &str) -> Result<usize> {
        self.names().index_of(Axis::Column, name)
    }

    fn row_name(&self, row: usize) -> Option<&str> {
        self.names().rows().name_at(row)
    }

    fn column_name(&self, col: usize) -> Option<&str> {
        self.names().columns().name_at(col)
    }

    fn row_names(&self) -> Vec<String> {
        self.names().rows().to_vec()
    }

    fn column_names(&self) -> Vec<String> {
        self.names().columns().to_vec()
    }

    fn contains_row_name(&self, name: &str) -> bool {
        self.names().rows().contains(name)
    }

    fn contains_column_name(&self, name: &str) -> bool {
        self.names().columns().contains(name)
    }

    /// Append a row name; an existing name is silently kept as is.
    fn add_row_name(&mut self, name: &str) {
        self.names_mut().add_row_name(name);
    }

    /// Name the row at `row`; an existing name is silently kept as is.
    fn add_row_name_at(&mut self, name: &str, row: usize) {
        self.names_mut().add_row_name_at(name, row);
    }

    /// Append a column name, failing on a duplicate.
    fn add_column_name(&mut self, name: &str) -> Result<()> {
        self.names_mut().add_column_name(name)
    }

    /// Name the column at `col`, failing on a duplicate.
    fn add_column_name_at(&mut self, name: &str, col: usize) -> Result<()> {
        self.names_mut().add_column_name_at(name, col)
    }

    /// Replace all row names (position = index).
    fn set_row_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()>
    where
        Self: Sized,
    {
        self.names_mut().set_names(Axis::Row, names)
    }

    /// Replace all column names (position = index).
    fn set_column_names<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()>
    where
        Self: Sized,
    {
        self.names_mut().set_names(Axis::Column, names)
    }
}

/// Storage that can hand out a row as an owned, independent copy.
///
/// Mutating the returned vector never affects the matrix.
pub trait CopyRow: NamedMatrix {
    fn row_copy(&self, row: usize) -> Vec<Self::Value>;
}

/// Storage that keeps each row contiguous and lends it out directly.
///
/// Writes through [`row_mut`](Self::row_mut) are writes to the matrix.
pub trait BorrowRow: NamedMatrix {
    fn row(&self, row: usize) -> &[Self::Value];

    fn row_mut(&mut self, row: usize) -> &mut [Self::Value];
}

/// Storage that can create an empty matrix of its own kind.
///
/// Filters use this as their default way of building output.
pub trait SameFamily: NamedMatrix + Sized {
    fn empty_like(&self, rows: usize, columns: usize) -> Self;
}

/// Something that builds an empty `rows x columns` matrix.
///
/// Any `Fn(usize, usize) -> M` closure is a factory.
pub trait MatrixFactory<M> {
    fn create(&self, rows: usize, columns: usize) -> M;
}

impl<M, F> MatrixFactory<M> for F
where
    F: Fn(usize, usize) -> M,
{
    fn create(&self, rows: usize, columns: usize) -> M {
        self(rows, columns)
    }
}
