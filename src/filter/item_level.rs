//! Blank out individual cells that fall outside a value range.

use crate::data::{MatrixFactory, NamedMatrix};
use crate::error::{MatrixError, Result};
use crate::filter::{unchanged, validate_cutoff, MatrixFilter};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Cell filter: any value outside `[low_cut, high_cut]` becomes NaN.
///
/// Rows and columns are never removed, so the output has exactly the input's
/// shape and names. Cells that are already missing stay missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemLevelFilter {
    low_cut: Option<f64>,
    high_cut: Option<f64>,
}

impl ItemLevelFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_low_cut(&mut self, value: f64) -> Result<()> {
        validate_cutoff("Low cut", value)?;
        check_order(Some(value), self.high_cut)?;
        self.low_cut = Some(value);
        Ok(())
    }

    pub fn set_high_cut(&mut self, value: f64) -> Result<()> {
        validate_cutoff("High cut", value)?;
        check_order(self.low_cut, Some(value))?;
        self.high_cut = Some(value);
        Ok(())
    }

    pub fn low_cut(&self) -> Option<f64> {
        self.low_cut
    }

    pub fn high_cut(&self) -> Option<f64> {
        self.high_cut
    }

    fn keeps(&self, value: f64, low: f64, high: f64) -> bool {
        !value.is_nan() && value >= low && value <= high
    }
}

fn check_order(low: Option<f64>, high: Option<f64>) -> Result<()> {
    match (low, high) {
        (Some(low), Some(high)) if low > high => Err(MatrixError::InvalidArgument(format!(
            "Low cut {} cannot be greater than high cut {}",
            low, high
        ))),
        _ => Ok(()),
    }
}

impl<M> MatrixFilter<M> for ItemLevelFilter
where
    M: NamedMatrix<Value = f64> + Clone,
{
    fn name(&self) -> &'static str {
        "item_level"
    }

    fn filter_with<F: MatrixFactory<M>>(&self, input: &M, factory: &F) -> Result<M> {
        let (low, high) = match (self.low_cut, self.high_cut) {
            (None, None) => return Ok(unchanged(MatrixFilter::<M>::name(self), input)),
            (low, high) => {
                if let Some(low) = low {
                    validate_cutoff("Low cut", low)?;
                }
                if let Some(high) = high {
                    validate_cutoff("High cut", high)?;
                }
                check_order(low, high)?;
                (low.unwrap_or(f64::NEG_INFINITY), high.unwrap_or(f64::INFINITY))
            }
        };

        let (rows, columns) = (input.rows(), input.columns());
        let mut output = factory.create(rows, columns);
        let mut blanked = 0usize;
        for row in 0..rows {
            for col in 0..columns {
                let value = input.get_quick(row, col);
                if self.keeps(value, low, high) {
                    output.set_quick(row, col, value);
                } else {
                    if !value.is_nan() {
                        blanked += 1;
                    }
                    output.set_quick(row, col, f64::NAN);
                }
            }
        }
        *output.names_mut() = input.names().clone();

        info!(filter = "item_level", blanked, rows, columns, "cells outside range set to missing");
        Ok(output)
    }
}
