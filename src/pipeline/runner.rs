//! Pipeline runner for composing and executing filter steps.

use crate::data::{NamedMatrix, SameFamily, StringMatrix};
use crate::error::{MatrixError, Result};
use crate::filter::{
    AffymetrixProbeNameFilter, FilterSummary, ItemLevelFilter, MatrixFilter, ProbeCriterion,
    RowAbsentFilter, RowAffyNameFilter, RowLevelFilter, RowMissingFilter, RowNameFilter,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// A step in the filter pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterStep {
    // === Row filters ===
    /// Keep rows whose summary statistic lies between two cutoffs.
    RowLevel(RowLevelFilter),
    /// Drop rows with too few present values.
    RowMissing(RowMissingFilter),
    /// Drop rows called absent too often. Needs a flag matrix at run time.
    RowAbsent {
        min_present_count: Option<usize>,
        min_present_fraction: Option<f64>,
        #[serde(default)]
        keep_marginal: bool,
    },
    /// Keep or drop rows by exact name.
    RowNames(RowNameFilter),
    /// Drop probes whose name contains a convention tag.
    AffyProbeNames(AffymetrixProbeNameFilter),
    /// Drop probes whose name starts or ends with a convention tag.
    RowAffyNames(RowAffyNameFilter),

    // === Cell filters ===
    /// Blank cells outside a value range.
    ItemLevel(ItemLevelFilter),
}

impl FilterStep {
    /// Short name for log output.
    pub fn label(&self) -> &'static str {
        match self {
            FilterStep::RowLevel(_) => "row_level",
            FilterStep::RowMissing(_) => "row_missing",
            FilterStep::RowAbsent { .. } => "row_absent",
            FilterStep::RowNames(_) => "row_names",
            FilterStep::AffyProbeNames(_) => "affy_probe_names",
            FilterStep::RowAffyNames(_) => "row_affy_names",
            FilterStep::ItemLevel(_) => "item_level",
        }
    }

    fn apply<M>(&self, input: &M, flags: Option<&StringMatrix>) -> Result<M>
    where
        M: NamedMatrix<Value = f64> + SameFamily + Clone,
    {
        match self {
            FilterStep::RowLevel(filter) => filter.filter(input),
            FilterStep::RowMissing(filter) => filter.filter(input),
            FilterStep::RowAbsent {
                min_present_count,
                min_present_fraction,
                keep_marginal,
            } => {
                let mut filter = RowAbsentFilter::new();
                if let Some(flags) = flags {
                    filter.set_flags(flags);
                }
                if let Some(count) = min_present_count {
                    filter.set_min_present_count(*count);
                }
                if let Some(fraction) = min_present_fraction {
                    filter.set_min_present_fraction(*fraction)?;
                }
                filter.set_keep_marginal(*keep_marginal);
                filter.filter(input)
            }
            FilterStep::RowNames(filter) => filter.filter(input),
            FilterStep::AffyProbeNames(filter) => filter.filter(input),
            FilterStep::RowAffyNames(filter) => filter.filter(input),
            FilterStep::ItemLevel(filter) => filter.filter(input),
        }
    }
}

/// Pipeline configuration for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of the pipeline.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Steps to execute.
    pub steps: Vec<FilterStep>,
}

impl PipelineConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(MatrixError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(MatrixError::from)
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(MatrixError::from)
    }

    /// Save to pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(MatrixError::from)
    }

    /// Load from a file; `.json` files are read as JSON, anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        if is_json(path) {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    /// Write to a file, choosing the format from the extension as in
    /// [`from_file`](Self::from_file).
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = if is_json(path) {
            self.to_json()?
        } else {
            self.to_yaml()?
        };
        std::fs::write(path, text)?;
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Builder for constructing and running filter pipelines.
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    steps: Vec<FilterStep>,
    name: String,
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterPipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            name: "unnamed".to_string(),
        }
    }

    /// Create from a config.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            steps: config.steps.clone(),
            name: config.name.clone(),
        }
    }

    /// Set the pipeline name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn steps(&self) -> &[FilterStep] {
        &self.steps
    }

    /// Append an already-built step.
    pub fn step(mut self, step: FilterStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Add a row-statistic filter.
    pub fn row_level(self, filter: RowLevelFilter) -> Self {
        self.step(FilterStep::RowLevel(filter))
    }

    /// Add a missing-value filter.
    pub fn row_missing(self, filter: RowMissingFilter) -> Self {
        self.step(FilterStep::RowMissing(filter))
    }

    /// Add a presence-call filter. The flag matrix is passed to [`run`](Self::run).
    pub fn row_absent(
        self,
        min_present_count: Option<usize>,
        min_present_fraction: Option<f64>,
        keep_marginal: bool,
    ) -> Self {
        self.step(FilterStep::RowAbsent {
            min_present_count,
            min_present_fraction,
            keep_marginal,
        })
    }

    /// Add a cell range filter.
    pub fn item_level(self, filter: ItemLevelFilter) -> Self {
        self.step(FilterStep::ItemLevel(filter))
    }

    /// Add a row name filter.
    pub fn row_names(self, filter: RowNameFilter) -> Self {
        self.step(FilterStep::RowNames(filter))
    }

    /// Drop probes whose name contains any of the tags.
    pub fn affy_probe_names(self, criteria: impl IntoIterator<Item = ProbeCriterion>) -> Self {
        self.step(FilterStep::AffyProbeNames(AffymetrixProbeNameFilter::new(criteria)))
    }

    /// Drop probes whose name starts with `AFFX` or ends with any of the tags.
    pub fn row_affy_names(self, criteria: impl IntoIterator<Item = ProbeCriterion>) -> Self {
        self.step(FilterStep::RowAffyNames(RowAffyNameFilter::new(criteria)))
    }

    /// Convert to config for serialization.
    pub fn to_config(&self, description: Option<&str>) -> PipelineConfig {
        PipelineConfig {
            name: self.name.clone(),
            description: description.map(String::from),
            steps: self.steps.clone(),
        }
    }

    /// Run every step in order on a copy of `input`.
    ///
    /// `flags` is only read by presence-call steps, which fail without it.
    pub fn run<M>(&self, input: &M, flags: Option<&StringMatrix>) -> Result<M>
    where
        M: NamedMatrix<Value = f64> + SameFamily + Clone,
    {
        self.run_with_summaries(input, flags).map(|(output, _)| output)
    }

    /// Run, also reporting the row counts around each step.
    pub fn run_with_summaries<M>(
        &self,
        input: &M,
        flags: Option<&StringMatrix>,
    ) -> Result<(M, Vec<FilterSummary>)>
    where
        M: NamedMatrix<Value = f64> + SameFamily + Clone,
    {
        info!(pipeline = %self.name, steps = self.steps.len(), "running pipeline");
        let mut current = input.clone();
        let mut summaries = Vec::with_capacity(self.steps.len());

        for (i, step) in self.steps.iter().enumerate() {
            let n_before = current.rows();
            current = step.apply(&current, flags).map_err(|e| {
                MatrixError::Pipeline(format!("Step {} ({}) failed: {}", i + 1, step.label(), e))
            })?;
            let summary = FilterSummary::new(n_before, current.rows());
            info!(
                step = i + 1,
                filter = step.label(),
                before = summary.n_before,
                after = summary.n_after,
                "step finished"
            );
            summaries.push(summary);
        }

        Ok((current, summaries))
    }
}
