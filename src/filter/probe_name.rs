//! Remove rows whose names follow Affymetrix probe naming conventions.

use crate::data::{MatrixFactory, NamedMatrix};
use crate::error::Result;
use crate::filter::{retain_rows, unchanged, MatrixFilter};
use regex::RegexSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// A probe naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProbeCriterion {
    /// Control probes, `AFFX...`.
    Affx,
    /// Cross-hybridising probes, `..._x_at`.
    X,
    /// Reverse strand probes, `..._st`.
    St,
    /// Gene family probes, `..._f_at`.
    F,
    /// Shared sequence probes, `..._s_at`.
    S,
    /// Group probes, `..._g_at`.
    G,
}

impl ProbeCriterion {
    pub const ALL: [ProbeCriterion; 6] = [
        ProbeCriterion::Affx,
        ProbeCriterion::X,
        ProbeCriterion::St,
        ProbeCriterion::F,
        ProbeCriterion::S,
        ProbeCriterion::G,
    ];

    /// The text identifying the convention in a probe name.
    pub fn tag(&self) -> &'static str {
        match self {
            ProbeCriterion::Affx => "AFFX",
            ProbeCriterion::X => "_x_at",
            ProbeCriterion::St => "_st",
            ProbeCriterion::F => "_f_at",
            ProbeCriterion::S => "_s_at",
            ProbeCriterion::G => "_g_at",
        }
    }

    /// Anchored pattern: a prefix for control probes, a suffix otherwise.
    pub fn pattern(&self) -> String {
        match self {
            ProbeCriterion::Affx => format!("^{}", regex::escape(self.tag())),
            _ => format!("{}$", regex::escape(self.tag())),
        }
    }
}

fn drop_matching<M, F>(
    filter: &'static str,
    input: &M,
    factory: &F,
    matches: impl Fn(&str) -> bool,
) -> M
where
    M: NamedMatrix,
    F: MatrixFactory<M>,
{
    let keep: Vec<usize> = (0..input.rows())
        .filter(|&row| match input.row_name(row) {
            Some(name) if matches(name) => {
                debug!(filter, probe = name, "probe removed");
                false
            }
            _ => true,
        })
        .collect();
    retain_rows(filter, input, &keep, factory)
}

/// Drops rows whose name contains any selected tag anywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AffymetrixProbeNameFilter {
    criteria: BTreeSet<ProbeCriterion>,
}

impl AffymetrixProbeNameFilter {
    pub fn new(criteria: impl IntoIterator<Item = ProbeCriterion>) -> Self {
        Self {
            criteria: criteria.into_iter().collect(),
        }
    }

    pub fn add_criterion(&mut self, criterion: ProbeCriterion) {
        self.criteria.insert(criterion);
    }

    pub fn criteria(&self) -> &BTreeSet<ProbeCriterion> {
        &self.criteria
    }

    pub fn matches(&self, name: &str) -> bool {
        self.criteria.iter().any(|c| name.contains(c.tag()))
    }
}

impl<M> MatrixFilter<M> for AffymetrixProbeNameFilter
where
    M: NamedMatrix + Clone,
{
    fn name(&self) -> &'static str {
        "affy_probe_name"
    }

    fn filter_with<F: MatrixFactory<M>>(&self, input: &M, factory: &F) -> Result<M> {
        let name = MatrixFilter::<M>::name(self);
        if self.criteria.is_empty() {
            return Ok(unchanged(name, input));
        }
        Ok(drop_matching(name, input, factory, |probe| self.matches(probe)))
    }
}

/// Drops rows whose name starts with `AFFX` or ends with a selected tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowAffyNameFilter {
    criteria: BTreeSet<ProbeCriterion>,
}

impl RowAffyNameFilter {
    pub fn new(criteria: impl IntoIterator<Item = ProbeCriterion>) -> Self {
        Self {
            criteria: criteria.into_iter().collect(),
        }
    }

    pub fn add_criterion(&mut self, criterion: ProbeCriterion) {
        self.criteria.insert(criterion);
    }

    pub fn criteria(&self) -> &BTreeSet<ProbeCriterion> {
        &self.criteria
    }

    fn compile(&self) -> Result<RegexSet> {
        Ok(RegexSet::new(self.criteria.iter().map(ProbeCriterion::pattern))?)
    }
}

impl<M> MatrixFilter<M> for RowAffyNameFilter
where
    M: NamedMatrix + Clone,
{
    fn name(&self) -> &'static str {
        "row_affy_name"
    }

    fn filter_with<F: MatrixFactory<M>>(&self, input: &M, factory: &F) -> Result<M> {
        let name = MatrixFilter::<M>::name(self);
        if self.criteria.is_empty() {
            return Ok(unchanged(name, input));
        }
        let patterns = self.compile()?;
        Ok(drop_matching(name, input, factory, |probe| patterns.is_match(probe)))
    }
}
