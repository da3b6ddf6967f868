//! Composition and execution of filter pipelines.

mod runner;

pub use runner::{FilterPipeline, FilterStep, PipelineConfig};
