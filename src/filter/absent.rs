//! Remove rows called absent too often in a presence/absence flag matrix.

use crate::data::{MatrixFactory, NamedMatrix, StringMatrix};
use crate::error::{MatrixError, Result};
use crate::filter::{retain_rows, unchanged, validate_fraction, MatrixFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One presence call from the flag matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresenceCall {
    Present,
    Absent,
    Marginal,
    /// Anything other than `P`, `A` or `M`, including an empty cell.
    Unknown,
}

impl PresenceCall {
    /// Parse `P`, `A` or `M`, ignoring case and surrounding whitespace.
    pub fn parse(flag: &str) -> Self {
        match flag.trim() {
            f if f.eq_ignore_ascii_case("P") => PresenceCall::Present,
            f if f.eq_ignore_ascii_case("A") => PresenceCall::Absent,
            f if f.eq_ignore_ascii_case("M") => PresenceCall::Marginal,
            _ => PresenceCall::Unknown,
        }
    }

    fn from_cell(cell: Option<&String>) -> Self {
        cell.map_or(PresenceCall::Unknown, |flag| Self::parse(flag))
    }
}

/// Row filter driven by presence calls.
///
/// A data cell counts as present unless it is missing, its flag is `A`, or
/// its flag is `M` and marginal calls are not kept. Unrecognised flags count
/// as present and are reported once per run.
///
/// Rows and columns are matched to the flag matrix by name. When the data
/// matrix has no name on an axis, positions are matched instead. A data row
/// with no counterpart in the flags is dropped; a data column with no
/// counterpart is not counted.
///
/// A row is kept when it meets `min_present_count` or
/// `min_present_fraction` (of the data columns), whichever are set.
#[derive(Debug, Clone, Default)]
pub struct RowAbsentFilter<'a> {
    flags: Option<&'a StringMatrix>,
    min_present_count: Option<usize>,
    min_present_fraction: Option<f64>,
    keep_marginal: bool,
}

impl<'a> RowAbsentFilter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(flags: &'a StringMatrix) -> Self {
        Self {
            flags: Some(flags),
            ..Self::default()
        }
    }

    pub fn set_flags(&mut self, flags: &'a StringMatrix) {
        self.flags = Some(flags);
    }

    pub fn set_min_present_count(&mut self, count: usize) {
        self.min_present_count = Some(count);
    }

    pub fn set_min_present_fraction(&mut self, fraction: f64) -> Result<()> {
        validate_fraction("Minimum present fraction", fraction)?;
        self.min_present_fraction = Some(fraction);
        Ok(())
    }

    /// Count marginal (`M`) calls as present.
    pub fn set_keep_marginal(&mut self, keep: bool) {
        self.keep_marginal = keep;
    }

    fn counts_as_present(&self, call: PresenceCall) -> bool {
        match call {
            PresenceCall::Absent => false,
            PresenceCall::Marginal => self.keep_marginal,
            PresenceCall::Present | PresenceCall::Unknown => true,
        }
    }

    fn passes(&self, present: usize, columns: usize) -> bool {
        let by_count = self.min_present_count.is_some_and(|count| present >= count);
        let by_fraction = self.min_present_fraction.is_some_and(|fraction| {
            columns > 0 && present as f64 / columns as f64 >= fraction
        });
        by_count || by_fraction
    }
}

/// Flag-matrix row for each data row, by name when the data is named.
fn align_rows<M: NamedMatrix>(input: &M, flags: &StringMatrix) -> Vec<Option<usize>> {
    (0..input.rows())
        .map(|row| match input.row_name(row) {
            Some(name) => flags.row_index_by_name(name).ok(),
            None => Some(row),
        })
        .map(|index| index.filter(|&i| i < flags.rows()))
        .collect()
}

/// Flag-matrix column for each data column, by name when the data is named.
fn align_columns<M: NamedMatrix>(input: &M, flags: &StringMatrix) -> Vec<Option<usize>> {
    (0..input.columns())
        .map(|col| match input.column_name(col) {
            Some(name) => flags.col_index_by_name(name).ok(),
            None => Some(col),
        })
        .map(|index| index.filter(|&i| i < flags.columns()))
        .collect()
}

impl<'a, M> MatrixFilter<M> for RowAbsentFilter<'a>
where
    M: NamedMatrix + Clone,
{
    fn name(&self) -> &'static str {
        "row_absent"
    }

    fn filter_with<F: MatrixFactory<M>>(&self, input: &M, factory: &F) -> Result<M> {
        let name = MatrixFilter::<M>::name(self);
        let flags = self.flags.ok_or_else(|| {
            MatrixError::InvalidState("A flag matrix must be set before filtering".to_string())
        })?;
        if flags.rows() < input.rows() || flags.columns() < input.columns() {
            return Err(MatrixError::InvalidState(format!(
                "Flag matrix ({} x {}) is smaller than the data matrix ({} x {})",
                flags.rows(),
                flags.columns(),
                input.rows(),
                input.columns()
            )));
        }
        if self.min_present_count.is_none() && self.min_present_fraction.is_none() {
            return Ok(unchanged(name, input));
        }
        let columns = input.columns();
        if let Some(count) = self.min_present_count {
            if count > columns {
                return Err(MatrixError::InvalidState(format!(
                    "Minimum present count {} exceeds the {} columns available",
                    count, columns
                )));
            }
        }
        if let Some(fraction) = self.min_present_fraction {
            validate_fraction("Minimum present fraction", fraction)?;
        }

        let flag_rows = align_rows(input, flags);
        let flag_columns = align_columns(input, flags);
        for (col, flag_col) in flag_columns.iter().enumerate() {
            if flag_col.is_none() {
                debug!(column = ?input.column_name(col), "column not in flag matrix, skipped");
            }
        }

        let mut unknown = 0usize;
        let mut keep = Vec::new();
        for (row, flag_row) in flag_rows.iter().enumerate() {
            let Some(flag_row) = *flag_row else {
                debug!(row = ?input.row_name(row), "row not in flag matrix, skipped");
                continue;
            };
            let mut present = 0usize;
            for (col, flag_col) in flag_columns.iter().enumerate() {
                let Some(flag_col) = *flag_col else {
                    continue;
                };
                let call = PresenceCall::from_cell(flags.cell(flag_row, flag_col));
                if call == PresenceCall::Unknown {
                    unknown += 1;
                }
                if !input.is_missing(row, col) && self.counts_as_present(call) {
                    present += 1;
                }
            }
            if self.passes(present, columns) {
                keep.push(row);
            }
        }

        if unknown > 0 {
            warn!(unknown, "unrecognised presence calls were treated as present");
        }
        Ok(retain_rows(name, input, &keep, factory))
    }
}
