//! Keep rows whose summary statistic falls between two cutoffs.

use crate::data::{MatrixFactory, NamedMatrix};
use crate::error::{MatrixError, Result};
use crate::filter::{retain_rows, unchanged, validate_cutoff, validate_fraction, MatrixFilter};
use crate::stats;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Statistic computed over the present values of each row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowCriterion {
    Min,
    #[default]
    Max,
    Mean,
    Median,
    /// `max - min`.
    Range,
    /// Coefficient of variation.
    Cv,
}

impl RowCriterion {
    /// Evaluate on one row. NaN when the row has no present values.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        match self {
            RowCriterion::Min => stats::min(values),
            RowCriterion::Max => stats::max(values),
            RowCriterion::Mean => stats::mean(values),
            RowCriterion::Median => stats::median(values),
            RowCriterion::Range => stats::range(values),
            RowCriterion::Cv => stats::coefficient_of_variation(values),
        }
    }
}

/// Row filter on a per-row statistic.
///
/// A row is kept when `low_cut <= criterion <= high_cut`. Either cutoff may be
/// an absolute value or a fraction of the considered rows. As a fraction,
/// `low_cut = l` resolves to the criterion at ascending position
/// `floor(n * l)` and `high_cut = h` to the criterion at position
/// `ceil(n * (1 - h)) - 1` counted from the top, both clamped into range.
/// Because the comparison is inclusive, ties at a resolved cutoff are all
/// kept, so a fractional cut may retain slightly more rows than `n * h`.
///
/// Rows whose criterion is undefined (no present values) are never kept.
/// With `remove_all_negative`, rows with no positive value are dropped
/// before fractional cutoffs are resolved, so fractions apply to the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowLevelFilter {
    method: RowCriterion,
    low_cut: Option<f64>,
    high_cut: Option<f64>,
    low_as_fraction: bool,
    high_as_fraction: bool,
    remove_all_negative: bool,
}

impl RowLevelFilter {
    pub fn new(method: RowCriterion) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn method(&self) -> RowCriterion {
        self.method
    }

    pub fn set_method(&mut self, method: RowCriterion) {
        self.method = method;
    }

    /// Set the lower cutoff.
    pub fn set_low_cut(&mut self, value: f64, as_fraction: bool) -> Result<()> {
        validate_cutoff("Low cut", value)?;
        if as_fraction {
            validate_fraction("Low cut", value)?;
        }
        self.check_order(Some((value, as_fraction)), self.high())?;
        self.low_cut = Some(value);
        self.low_as_fraction = as_fraction;
        Ok(())
    }

    /// Set the upper cutoff.
    pub fn set_high_cut(&mut self, value: f64, as_fraction: bool) -> Result<()> {
        validate_cutoff("High cut", value)?;
        if as_fraction {
            validate_fraction("High cut", value)?;
        }
        self.check_order(self.low(), Some((value, as_fraction)))?;
        self.high_cut = Some(value);
        self.high_as_fraction = as_fraction;
        Ok(())
    }

    /// Interpret both cutoffs as fractions (or both as absolute values).
    pub fn set_use_as_fraction(&mut self, as_fraction: bool) -> Result<()> {
        if as_fraction {
            if let Some(low) = self.low_cut {
                validate_fraction("Low cut", low)?;
            }
            if let Some(high) = self.high_cut {
                validate_fraction("High cut", high)?;
            }
        }
        self.low_as_fraction = as_fraction;
        self.high_as_fraction = as_fraction;
        Ok(())
    }

    /// Drop rows with no positive value before anything else.
    pub fn set_remove_all_negative(&mut self, remove: bool) {
        self.remove_all_negative = remove;
    }

    /// Lower cutoff and whether it is a fraction.
    pub fn low(&self) -> Option<(f64, bool)> {
        self.low_cut.map(|v| (v, self.low_as_fraction))
    }

    /// Upper cutoff and whether it is a fraction.
    pub fn high(&self) -> Option<(f64, bool)> {
        self.high_cut.map(|v| (v, self.high_as_fraction))
    }

    fn check_order(&self, low: Option<(f64, bool)>, high: Option<(f64, bool)>) -> Result<()> {
        if let (Some((low, low_frac)), Some((high, high_frac))) = (low, high) {
            if low_frac == high_frac && low > high {
                return Err(MatrixError::InvalidArgument(format!(
                    "Low cut {} cannot be greater than high cut {}",
                    low, high
                )));
            }
        }
        Ok(())
    }

    /// Re-check a configuration that may not have come through the setters.
    fn validate(&self) -> Result<()> {
        if let Some((low, frac)) = self.low() {
            validate_cutoff("Low cut", low)?;
            if frac {
                validate_fraction("Low cut", low)?;
            }
        }
        if let Some((high, frac)) = self.high() {
            validate_cutoff("High cut", high)?;
            if frac {
                validate_fraction("High cut", high)?;
            }
        }
        self.check_order(self.low(), self.high())
    }

    /// Resolve both cutoffs against the sorted criteria of the considered rows.
    fn resolve_cutoffs(&self, sorted: &[f64]) -> (f64, f64) {
        let n = sorted.len();
        let low = match self.low() {
            None => f64::NEG_INFINITY,
            Some((fraction, true)) => {
                let index = ((n as f64 * fraction).floor() as usize).min(n - 1);
                sorted[index]
            }
            Some((value, false)) => value,
        };
        let high = match self.high() {
            None => f64::INFINITY,
            Some((fraction, true)) => {
                let from_top = ((n as f64 * (1.0 - fraction)).ceil() as usize)
                    .saturating_sub(1)
                    .min(n - 1);
                sorted[n - 1 - from_top]
            }
            Some((value, false)) => value,
        };
        (low, high)
    }
}

fn all_non_positive(values: &[f64]) -> bool {
    values.iter().all(|&v| v.is_nan() || v <= 0.0)
}

impl<M> MatrixFilter<M> for RowLevelFilter
where
    M: NamedMatrix<Value = f64> + Clone,
{
    fn name(&self) -> &'static str {
        "row_level"
    }

    fn filter_with<F: MatrixFactory<M>>(&self, input: &M, factory: &F) -> Result<M> {
        self.validate()?;
        if self.low_cut.is_none() && self.high_cut.is_none() && !self.remove_all_negative {
            return Ok(unchanged(MatrixFilter::<M>::name(self), input));
        }

        let n_rows = input.rows();
        let mut criteria = Vec::with_capacity(n_rows);
        let mut considered = Vec::with_capacity(n_rows);
        for row in 0..n_rows {
            let values = input.row_obj(row);
            let criterion = self.method.evaluate(&values);
            let excluded = self.remove_all_negative && all_non_positive(&values);
            if excluded {
                debug!(row, "row has no positive values, excluded");
            }
            criteria.push(criterion);
            considered.push(!excluded && !criterion.is_nan());
        }

        let mut sorted: Vec<f64> = criteria
            .iter()
            .zip(&considered)
            .filter(|(_, ok)| **ok)
            .map(|(&c, _)| c)
            .collect();
        if sorted.is_empty() {
            return Ok(retain_rows(MatrixFilter::<M>::name(self), input, &[], factory));
        }
        sorted.sort_by(f64::total_cmp);

        let (low, high) = self.resolve_cutoffs(&sorted);
        debug!(method = ?self.method, low, high, considered = sorted.len(), "resolved cutoffs");

        let keep: Vec<usize> = (0..n_rows)
            .filter(|&row| considered[row] && criteria[row] >= low && criteria[row] <= high)
            .collect();

        Ok(retain_rows(MatrixFilter::<M>::name(self), input, &keep, factory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DenseMatrix;

    fn create_test_matrix() -> DenseMatrix {
        // 10 rows × 3 columns; row i has max value i + 1
        let rows: Vec<Vec<f64>> = (0..10)
            .map(|i| {
                let top = (i + 1) as f64;
                vec![top / 2.0, top, top / 4.0]
            })
            .collect();
        let mut mat = DenseMatrix::from_rows(&rows).unwrap();
        let names: Vec<String> = (0..10).map(|i| format!("gene_{}", i)).collect();
        mat.set_row_names(&names).unwrap();
        mat.set_column_names(&["s1", "s2", "s3"]).unwrap();
        mat
    }

    fn create_mixed_sign_matrix() -> DenseMatrix {
        let mut mat = DenseMatrix::from_rows(&[
            vec![-1.0, -2.0, 0.0],
            vec![1.0, 2.0, 3.0],
            vec![f64::NAN, -5.0, -1.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ])
        .unwrap();
        mat.set_row_names(&["neg", "low", "neg_nan", "mid", "high"]).unwrap();
        mat.set_column_names(&["s1", "s2", "s3"]).unwrap();
        mat
    }

    #[test]
    fn test_no_criteria_returns_input() {
        let mat = create_test_matrix();
        let filter = RowLevelFilter::default();
        let out = filter.filter(&mat).unwrap();
        assert_eq!(out, mat);
    }

    #[test]
    fn test_absolute_cuts() {
        let mat = create_test_matrix();
        let mut filter = RowLevelFilter::default();
        filter.set_low_cut(3.0, false).unwrap();
        filter.set_high_cut(7.0, false).unwrap();

        let out = filter.filter(&mat).unwrap();
        // Max values 3..=7 are rows 2..=6
        assert_eq!(out.rows(), 5);
        assert_eq!(out.row_names(), vec!["gene_2", "gene_3", "gene_4", "gene_5", "gene_6"]);
        assert_eq!(out.column_names(), vec!["s1", "s2", "s3"]);
        assert_eq!(out.row_by_name("gene_2").unwrap(), mat.row_by_name("gene_2").unwrap());
    }

    #[test]
    fn test_full_fraction_range_keeps_everything() {
        let mat = create_test_matrix();
        let mut filter = RowLevelFilter::default();
        filter.set_low_cut(0.0, true).unwrap();
        filter.set_high_cut(1.0, true).unwrap();
        assert_eq!(filter.filter(&mat).unwrap().rows(), 10);
    }

    #[test]
    fn test_fraction_cuts() {
        let mat = create_test_matrix();

        let mut filter = RowLevelFilter::default();
        filter.set_low_cut(0.2, true).unwrap();
        // floor(10 * 0.2) = 2 → cutoff 3.0, keeps max values 3..=10
        assert_eq!(filter.filter(&mat).unwrap().rows(), 8);

        let mut filter = RowLevelFilter::default();
        filter.set_high_cut(0.5, true).unwrap();
        // ceil(10 * 0.5) - 1 = 4 from the top → cutoff 6.0, keeps 1..=6
        let out = filter.filter(&mat).unwrap();
        assert_eq!(out.rows(), 6);
        assert_eq!(out.row_name(5), Some("gene_5"));
    }

    #[test]
    fn test_fraction_cut_keeps_ties() {
        let mut mat =
            DenseMatrix::from_rows(&[vec![1.0], vec![2.0], vec![2.0], vec![2.0]]).unwrap();
        mat.set_row_names(&["a", "b", "c", "d"]).unwrap();
        let mut filter = RowLevelFilter::default();
        filter.set_low_cut(0.5, true).unwrap();
        // Cutoff resolves to 2.0 and all three tied rows survive
        assert_eq!(filter.filter(&mat).unwrap().rows(), 3);
    }

    #[test]
    fn test_remove_all_negative() {
        let mat = create_mixed_sign_matrix();
        let mut filter = RowLevelFilter::default();
        filter.set_remove_all_negative(true);
        let out = filter.filter(&mat).unwrap();
        assert_eq!(out.row_names(), vec!["low", "mid", "high"]);
    }

    #[test]
    fn test_fraction_applies_to_considered_rows_only() {
        let mat = create_mixed_sign_matrix();
        let mut filter = RowLevelFilter::default();
        filter.set_remove_all_negative(true);
        filter.set_low_cut(0.4, true).unwrap();
        // Three considered rows with max 3, 6, 9; floor(3 * 0.4) = 1 → cutoff 6
        let out = filter.filter(&mat).unwrap();
        assert_eq!(out.row_names(), vec!["mid", "high"]);
    }

    #[test]
    fn test_methods() {
        let mat = create_mixed_sign_matrix();

        let mut filter = RowLevelFilter::new(RowCriterion::Mean);
        filter.set_low_cut(4.0, false).unwrap();
        assert_eq!(filter.filter(&mat).unwrap().row_names(), vec!["mid", "high"]);

        let mut filter = RowLevelFilter::new(RowCriterion::Min);
        filter.set_high_cut(-1.0, false).unwrap();
        assert_eq!(filter.filter(&mat).unwrap().row_names(), vec!["neg", "neg_nan"]);

        let mut filter = RowLevelFilter::new(RowCriterion::Range);
        filter.set_low_cut(3.0, false).unwrap();
        assert_eq!(filter.filter(&mat).unwrap().row_names(), vec!["neg_nan"]);
    }

    #[test]
    fn test_undefined_criterion_dropped() {
        let mut mat = DenseMatrix::from_rows(&[vec![f64::NAN, f64::NAN], vec![1.0, 2.0]]).unwrap();
        mat.set_row_names(&["empty", "full"]).unwrap();
        let mut filter = RowLevelFilter::default();
        filter.set_low_cut(0.0, true).unwrap();
        assert_eq!(filter.filter(&mat).unwrap().row_names(), vec!["full"]);
    }

    #[test]
    fn test_invalid_configuration() {
        let mut filter = RowLevelFilter::default();
        assert!(matches!(
            filter.set_low_cut(1.5, true),
            Err(MatrixError::InvalidArgument(_))
        ));
        assert!(filter.set_high_cut(-0.1, true).is_err());
        assert!(filter.set_low_cut(f64::NAN, false).is_err());

        filter.set_low_cut(10.0, false).unwrap();
        assert!(filter.set_high_cut(5.0, false).is_err());
        assert!(filter.set_use_as_fraction(true).is_err());
    }

    #[test]
    fn test_never_grows() {
        let mat = create_mixed_sign_matrix();
        for method in [
            RowCriterion::Min,
            RowCriterion::Max,
            RowCriterion::Mean,
            RowCriterion::Median,
            RowCriterion::Range,
            RowCriterion::Cv,
        ] {
            let mut filter = RowLevelFilter::new(method);
            filter.set_low_cut(0.1, true).unwrap();
            filter.set_high_cut(0.9, true).unwrap();
            assert!(filter.filter(&mat).unwrap().rows() <= mat.rows());
        }
    }

    #[test]
    fn test_summary() {
        let mat = create_test_matrix();
        let mut filter = RowLevelFilter::default();
        filter.set_low_cut(6.0, false).unwrap();
        let (out, summary) = filter.filter_with_summary(&mat).unwrap();
        assert_eq!(out.rows(), 5);
        assert_eq!(summary.n_before, 10);
        assert_eq!(summary.n_removed, 5);
    }
}
