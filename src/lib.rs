//! Named Expression Matrix Library
//!
//! Two-dimensional tables with named rows and columns, several storage
//! strategies behind one contract, and composable filters for cleaning
//! expression data.
//!
//! # Overview
//!
//! - **data**: `NamedMatrix` and its storage variants (dense, fast-row,
//!   compressed sparse, ragged sparse, object), plus `SparseVector`
//! - **filter**: row and cell filters (statistic cutoffs, missing values,
//!   presence calls, names, probe naming conventions)
//! - **pipeline**: serializable composition of filters
//! - **stats**: descriptive statistics over present values
//! - **logging**: tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use expression_matrix::prelude::*;
//!
//! let mut matrix = DenseMatrix::from_rows(&[
//!     vec![1.0, 2.0, 3.0],
//!     vec![f64::NAN, f64::NAN, 4.0],
//! ])
//! .unwrap();
//! matrix.set_row_names(&["100_at", "AFFX-Ctrl_at"]).unwrap();
//!
//! let mut missing = RowMissingFilter::new();
//! missing.set_min_present_count(2);
//!
//! let filtered = FilterPipeline::new()
//!     .row_affy_names([ProbeCriterion::Affx])
//!     .row_missing(missing)
//!     .run(&matrix, None)
//!     .unwrap();
//! assert_eq!(filtered.rows(), 1);
//! ```

pub mod data;
pub mod error;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod stats;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{
        Axis, BorrowRow, CompressedSparseMatrix, CopyRow, DenseMatrix, FastRowMatrix,
        MatrixFactory, NamedMatrix, ObjectMatrix, OnDuplicate, RaggedMatrix, SameFamily,
        SparseVector, StringMatrix,
    };
    pub use crate::error::{MatrixError, Result};
    pub use crate::filter::{
        AffymetrixProbeNameFilter, FilterSummary, ItemLevelFilter, MatrixFilter, PresenceCall,
        ProbeCriterion, RowAbsentFilter, RowAffyNameFilter, RowCriterion, RowLevelFilter,
        RowMissingFilter, RowNameFilter, ABSOLUTE_MINIMUM_PRESENT,
    };
    pub use crate::pipeline::{FilterPipeline, FilterStep, PipelineConfig};
}
