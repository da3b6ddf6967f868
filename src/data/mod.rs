//! Named matrices and the sparse vector they are built from.

mod compressed;
mod dense;
mod fast_row;
mod matrix;
mod names;
mod object;
mod ragged;
mod sparse_vector;

pub use compressed::CompressedSparseMatrix;
pub use dense::DenseMatrix;
pub use fast_row::FastRowMatrix;
pub use matrix::{BorrowRow, CopyRow, MatrixFactory, NamedMatrix, SameFamily};
pub use names::{Axis, NameIndex, NameMap, OnDuplicate};
pub use object::{ObjectMatrix, StringMatrix};
pub use ragged::RaggedMatrix;
pub use sparse_vector::SparseVector;
