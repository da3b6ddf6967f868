//! Row- and cell-level filters for named matrices.
//!
//! Every filter reads its input through [`NamedMatrix`] and builds a fresh
//! output matrix; inputs are never modified. A filter with no criteria
//! configured returns a copy of its input and logs that nothing was done.

pub mod absent;
pub mod item_level;
pub mod missing;
pub mod probe_name;
pub mod row_level;
pub mod row_name;

pub use absent::{PresenceCall, RowAbsentFilter};
pub use item_level::ItemLevelFilter;
pub use missing::{RowMissingFilter, ABSOLUTE_MINIMUM_PRESENT};
pub use probe_name::{AffymetrixProbeNameFilter, ProbeCriterion, RowAffyNameFilter};
pub use row_level::{RowCriterion, RowLevelFilter};
pub use row_name::RowNameFilter;

use crate::data::{Axis, MatrixFactory, NamedMatrix, SameFamily};
use crate::error::{MatrixError, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// A transformation from one matrix to a new, possibly smaller, matrix.
pub trait MatrixFilter<M: NamedMatrix + Clone> {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Filter `input`, building the output with `factory`.
    fn filter_with<F: MatrixFactory<M>>(&self, input: &M, factory: &F) -> Result<M>;

    /// Filter `input` into a new matrix of the same storage type.
    fn filter(&self, input: &M) -> Result<M>
    where
        M: SameFamily,
    {
        self.filter_with(input, &|rows: usize, columns: usize| {
            input.empty_like(rows, columns)
        })
    }

    /// Filter and report how many rows survived.
    fn filter_with_summary(&self, input: &M) -> Result<(M, FilterSummary)>
    where
        M: SameFamily,
    {
        let n_before = input.rows();
        let filtered = self.filter(input)?;
        let summary = FilterSummary::new(n_before, filtered.rows());
        Ok((filtered, summary))
    }
}

/// Row counts before and after a filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSummary {
    /// Number of rows before filtering.
    pub n_before: usize,
    /// Number of rows after filtering.
    pub n_after: usize,
    /// Number of rows removed.
    pub n_removed: usize,
    /// Proportion of rows retained.
    pub retention_rate: f64,
}

impl FilterSummary {
    pub fn new(n_before: usize, n_after: usize) -> Self {
        Self {
            n_before,
            n_after,
            n_removed: n_before.saturating_sub(n_after),
            retention_rate: if n_before > 0 {
                n_after as f64 / n_before as f64
            } else {
                1.0
            },
        }
    }
}

impl std::fmt::Display for FilterSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Filter Summary")?;
        writeln!(f, "  Before:    {} rows", self.n_before)?;
        writeln!(f, "  After:     {} rows", self.n_after)?;
        writeln!(f, "  Removed:   {} rows", self.n_removed)?;
        writeln!(f, "  Retained:  {:.1}%", self.retention_rate * 100.0)?;
        Ok(())
    }
}

/// Copy of the input, logged as a no-op.
pub(crate) fn unchanged<M: Clone>(filter: &'static str, input: &M) -> M {
    info!(filter, "no filtering was requested, returning input unchanged");
    input.clone()
}

/// Build an output holding the rows in `keep`, in order.
///
/// Row names follow their rows; column names are copied as they are. The
/// output may use a different storage than the input.
pub(crate) fn retain_rows<I, O, F>(
    filter: &'static str,
    input: &I,
    keep: &[usize],
    factory: &F,
) -> O
where
    I: NamedMatrix,
    O: NamedMatrix<Value = I::Value>,
    F: MatrixFactory<O>,
{
    let columns = input.columns();
    let mut output = factory.create(keep.len(), columns);
    for (new_row, &old_row) in keep.iter().enumerate() {
        for col in 0..columns {
            output.set_quick(new_row, col, input.get_quick(old_row, col));
        }
        if let Some(name) = input.row_name(old_row) {
            output.add_row_name_at(name, new_row);
        }
    }
    output.names_mut().copy_axis_from(Axis::Column, input.names());
    info!(filter, kept = keep.len(), of = input.rows(), "rows retained");
    output
}

/// Fail unless `value` lies in `[0, 1]`.
pub(crate) fn validate_fraction(what: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MatrixError::InvalidArgument(format!(
            "{} must be a fraction between 0 and 1, got {}",
            what, value
        )));
    }
    Ok(())
}

/// Fail on a NaN cutoff.
pub(crate) fn validate_cutoff(what: &str, value: f64) -> Result<()> {
    if value.is_nan() {
        return Err(MatrixError::InvalidArgument(format!("{} cannot be NaN", what)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DenseMatrix, RaggedMatrix};

    fn create_test_matrix() -> DenseMatrix {
        let mut mat = DenseMatrix::from_rows(&[
            vec![1.0, 2.0],
            vec![3.0, f64::NAN],
            vec![5.0, 6.0],
        ])
        .unwrap();
        mat.set_row_names(&["a", "b", "c"]).unwrap();
        mat.set_column_names(&["x", "y"]).unwrap();
        mat
    }

    #[test]
    fn test_retain_rows_copies_names_and_values() {
        let mat = create_test_matrix();
        let factory = |r: usize, c: usize| DenseMatrix::zeros(r, c);
        let out = retain_rows("test", &mat, &[0, 2], &factory);
        assert_eq!(out.rows(), 2);
        assert_eq!(out.row_names(), vec!["a", "c"]);
        assert_eq!(out.column_names(), vec!["x", "y"]);
        assert_eq!(out.row_by_name("c").unwrap(), vec![5.0, 6.0]);
    }

    #[test]
    fn test_retain_rows_into_other_storage() {
        let mat = create_test_matrix();
        let factory = |r: usize, _c: usize| RaggedMatrix::with_rows(r);
        let out = retain_rows("test", &mat, &[1], &factory);
        assert_eq!(out.rows(), 1);
        assert!(out.is_missing(0, 1));
        assert_eq!(out.row(0).indices(), &[0, 1]);
        assert_eq!(out.get_quick(0, 0), 3.0);
    }

    #[test]
    fn test_summary() {
        let summary = FilterSummary::new(5, 3);
        assert_eq!(summary.n_removed, 2);
        assert!((summary.retention_rate - 0.6).abs() < 1e-10);
        assert!(summary.to_string().contains("Removed:   2 rows"));
    }

    #[test]
    fn test_validate_fraction() {
        assert!(validate_fraction("cut", 0.0).is_ok());
        assert!(validate_fraction("cut", 1.0).is_ok());
        assert!(matches!(
            validate_fraction("cut", 1.5),
            Err(MatrixError::InvalidArgument(_))
        ));
        assert!(validate_fraction("cut", f64::NAN).is_err());
    }
}
