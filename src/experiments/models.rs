//! Experiment, assignment, and metric models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One arm of an experiment, bound to a recommendation algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub algorithm: String,
}

/// Experiment lifecycle status. Only `Active` affects behavior; there is no
/// automatic transition logic (e.g. closing at the end date).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentStatus {
    Active,
    Paused,
    Completed,
}

impl ExperimentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperimentStatus::Active => "active",
            ExperimentStatus::Paused => "paused",
            ExperimentStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ExperimentStatus::Active),
            "paused" => Some(ExperimentStatus::Paused),
            "completed" => Some(ExperimentStatus::Completed),
            _ => None,
        }
    }
}

/// A configured A/B test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub variants: Vec<Variant>,
    /// Traffic fractions parallel to `variants`. Used as provided; no
    /// normalization is performed.
    pub traffic_split: Vec<f64>,
    pub success_metrics: Vec<String>,
    pub status: ExperimentStatus,
}

/// Caller-supplied configuration for a new experiment. Missing fields get
/// framework defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExperimentConfig {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub variants: Vec<Variant>,
    pub traffic_split: Option<Vec<f64>>,
    pub success_metrics: Option<Vec<String>>,
}

/// Binds one user to one experiment's variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantAssignment {
    pub user_id: String,
    pub experiment_id: String,
    pub variant_id: String,
    pub algorithm: String,
    pub assigned_at: DateTime<Utc>,
}

/// One recorded measurement for a variant/metric pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub variant_id: String,
    pub metric: String,
    pub value: f64,
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Descriptive statistics over one variant/metric sample set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricStats {
    pub count: usize,
    pub mean: f64,
    /// Average of the two middle values for even-length samples.
    pub median: f64,
    /// Population standard deviation (not sample-corrected).
    pub std_dev: f64,
}

/// High-level summary of an experiment's run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentSummary {
    /// Distinct users assigned to this experiment.
    pub total_users: usize,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub elapsed_days: i64,
}

/// Full results view: definition, summary, and per-variant/per-metric stats.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentResults {
    pub experiment: Experiment,
    pub summary: ExperimentSummary,
    /// Keyed by variant id, then metric name.
    pub metrics: HashMap<String, HashMap<String, MetricStats>>,
}
