//! Remove rows with too many missing values.

use crate::data::{MatrixFactory, NamedMatrix};
use crate::error::{MatrixError, Result};
use crate::filter::{retain_rows, unchanged, validate_fraction, MatrixFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A row always needs at least this many present values, whatever the
/// configured count.
pub const ABSOLUTE_MINIMUM_PRESENT: usize = 1;

/// Row filter on the number of present (non-missing) values.
///
/// The threshold is `min_present_count`, or `ceil(min_present_fraction ×
/// columns)` when only a fraction is set, and never below
/// [`ABSOLUTE_MINIMUM_PRESENT`].
///
/// With `max_fraction_removed = f`, at most `floor(rows × f)` rows are ever
/// dropped. If the threshold would drop more, it is lowered to the present
/// count found at that position among the rows sorted by present count, and
/// rows below the requested threshold are admitted. A lowered threshold may
/// fall to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowMissingFilter {
    min_present_count: Option<usize>,
    min_present_fraction: Option<f64>,
    max_fraction_removed: Option<f64>,
}

impl RowMissingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_min_present_count(&mut self, count: usize) {
        self.min_present_count = Some(count);
    }

    /// Fraction of columns that must be present.
    pub fn set_min_present_fraction(&mut self, fraction: f64) -> Result<()> {
        validate_fraction("Minimum present fraction", fraction)?;
        self.min_present_fraction = Some(fraction);
        Ok(())
    }

    /// Cap the fraction of rows this filter may remove.
    pub fn set_max_fraction_removed(&mut self, fraction: f64) -> Result<()> {
        validate_fraction("Maximum fraction removed", fraction)?;
        self.max_fraction_removed = Some(fraction);
        Ok(())
    }

    pub fn min_present_count(&self) -> Option<usize> {
        self.min_present_count
    }

    pub fn min_present_fraction(&self) -> Option<f64> {
        self.min_present_fraction
    }

    pub fn max_fraction_removed(&self) -> Option<f64> {
        self.max_fraction_removed
    }

    /// Threshold for a matrix with `columns` columns, or `None` if unset.
    fn threshold(&self, columns: usize) -> Result<Option<usize>> {
        let requested = match (self.min_present_count, self.min_present_fraction) {
            (Some(count), _) => count,
            (None, Some(fraction)) => {
                validate_fraction("Minimum present fraction", fraction)?;
                (fraction * columns as f64).ceil() as usize
            }
            (None, None) => return Ok(None),
        };
        if requested > columns {
            return Err(MatrixError::InvalidState(format!(
                "Minimum present count {} exceeds the {} columns available",
                requested, columns
            )));
        }
        Ok(Some(requested.max(ABSOLUTE_MINIMUM_PRESENT)))
    }
}

fn present_count<M: NamedMatrix>(input: &M, row: usize) -> usize {
    (0..input.columns()).filter(|&col| !input.is_missing(row, col)).count()
}

impl<M> MatrixFilter<M> for RowMissingFilter
where
    M: NamedMatrix + Clone,
{
    fn name(&self) -> &'static str {
        "row_missing"
    }

    fn filter_with<F: MatrixFactory<M>>(&self, input: &M, factory: &F) -> Result<M> {
        let name = MatrixFilter::<M>::name(self);
        let Some(mut threshold) = self.threshold(input.columns())? else {
            return Ok(unchanged(name, input));
        };

        let n_rows = input.rows();
        let counts: Vec<usize> = (0..n_rows).map(|row| present_count(input, row)).collect();
        let removed = counts.iter().filter(|&&c| c < threshold).count();
        debug!(threshold, removed, rows = n_rows, "applied present-count threshold");

        if let Some(max_fraction) = self.max_fraction_removed {
            validate_fraction("Maximum fraction removed", max_fraction)?;
            let allowed = (n_rows as f64 * max_fraction).floor() as usize;
            if removed > allowed {
                let mut sorted = counts.clone();
                sorted.sort_unstable();
                let lowered = sorted[allowed.min(n_rows - 1)];
                warn!(
                    requested = threshold,
                    lowered,
                    allowed,
                    "too many rows would be removed, lowering the present-count threshold"
                );
                threshold = lowered;
            }
        }

        let keep: Vec<usize> = (0..n_rows).filter(|&row| counts[row] >= threshold).collect();
        Ok(retain_rows(name, input, &keep, factory))
    }
}
