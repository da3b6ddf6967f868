//! Descriptive statistics over the present values of a row.
//!
//! Thin wrappers around `statrs`; NaN entries are dropped before computing.

use statrs::statistics::{Data, Median, Statistics};

/// Non-NaN values of a row.
pub fn present(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Smallest present value, NaN if none.
pub fn min(values: &[f64]) -> f64 {
    Statistics::min(present(values).iter())
}

/// Largest present value, NaN if none.
pub fn max(values: &[f64]) -> f64 {
    Statistics::max(present(values).iter())
}

/// Mean of present values, NaN if none.
pub fn mean(values: &[f64]) -> f64 {
    Statistics::mean(present(values).iter())
}

/// Median of present values, NaN if none.
pub fn median(values: &[f64]) -> f64 {
    let present = present(values);
    if present.is_empty() {
        return f64::NAN;
    }
    Data::new(present).median()
}

/// `max - min` of present values.
pub fn range(values: &[f64]) -> f64 {
    max(values) - min(values)
}

/// Coefficient of variation: sample standard deviation over the mean.
///
/// NaN with fewer than two present values or a zero mean.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let present = present(values);
    if present.len() < 2 {
        return f64::NAN;
    }
    let mean = Statistics::mean(present.iter());
    if mean == 0.0 {
        return f64::NAN;
    }
    Statistics::std_dev(present.iter()) / mean
}
