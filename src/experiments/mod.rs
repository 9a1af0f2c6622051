//! A/B experiment definitions, bucketing, and metric aggregation.

mod framework;
mod models;

pub use framework::ExperimentFramework;
pub use models::{
    Experiment, ExperimentConfig, ExperimentResults, ExperimentStatus, ExperimentSummary,
    MetricSample, MetricStats, Variant, VariantAssignment,
};
