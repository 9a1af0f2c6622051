//! A/B experiment framework.
//!
//! Defines experiments, deterministically buckets users into variants, and
//! aggregates recorded metric samples into descriptive statistics.

use super::models::{
    Experiment, ExperimentConfig, ExperimentResults, ExperimentStatus, ExperimentSummary,
    MetricSample, MetricStats, VariantAssignment,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, warn};

struct ExperimentState {
    experiments: HashMap<String, Experiment>,
    /// Assignments keyed by "user_id:experiment_id".
    assignments: HashMap<String, VariantAssignment>,
    /// Per-experiment metric store: "variant_id:metric" -> samples.
    metrics: HashMap<String, HashMap<String, Vec<MetricSample>>>,
}

/// Framework owning experiment definitions, assignments, and metric samples.
pub struct ExperimentFramework {
    state: Mutex<ExperimentState>,
    default_traffic_split: Vec<f64>,
    default_success_metrics: Vec<String>,
}

/// 32-bit rolling multiply-add hash over the input bytes.
///
/// Deterministic bucketing only; not cryptographic and not resistant to
/// adversarial inputs. The rolling core alone does not diffuse ids that
/// differ only in a trailing counter, so the result is folded through a
/// xorshift-multiply finalizer before use.
fn bucket_hash(input: &str) -> u32 {
    let mut hash: u32 = 0;
    for byte in input.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(byte as u32);
    }
    hash ^= hash >> 16;
    hash = hash.wrapping_mul(0x85eb_ca6b);
    hash ^= hash >> 13;
    hash = hash.wrapping_mul(0xc2b2_ae35);
    hash ^= hash >> 16;
    hash
}

/// Normalize a 32-bit hash to [0, 1).
fn normalize_hash(hash: u32) -> f64 {
    hash as f64 / (u32::MAX as f64 + 1.0)
}

fn assignment_key(user_id: &str, experiment_id: &str) -> String {
    format!("{}:{}", user_id, experiment_id)
}

fn metric_key(variant_id: &str, metric: &str) -> String {
    format!("{}:{}", variant_id, metric)
}

fn generate_experiment_id() -> String {
    format!(
        "exp_{}_{:08x}",
        Utc::now().timestamp_millis(),
        rand::random::<u32>()
    )
}

fn compute_stats(samples: &[MetricSample]) -> MetricStats {
    let count = samples.len();
    if count == 0 {
        return MetricStats {
            count: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
        };
    }

    let values: Vec<f64> = samples.iter().map(|s| s.value).collect();
    let mean = values.iter().sum::<f64>() / count as f64;

    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    // Population variance: mean of squared deviations.
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

    MetricStats {
        count,
        mean,
        median,
        std_dev: variance.sqrt(),
    }
}

impl ExperimentFramework {
    pub fn new(default_traffic_split: Vec<f64>, default_success_metrics: Vec<String>) -> Self {
        Self {
            state: Mutex::new(ExperimentState {
                experiments: HashMap::new(),
                assignments: HashMap::new(),
                metrics: HashMap::new(),
            }),
            default_traffic_split,
            default_success_metrics,
        }
    }

    /// Create an experiment from the given configuration.
    ///
    /// Missing id, traffic split, and success metrics get defaults; status
    /// starts as Active and an empty metric store is initialized. Split
    /// fractions are used as provided; a mismatched or non-unit split only
    /// produces a warning because the assignment fallback keeps it working
    /// (misassigning users in proportion to the shortfall).
    pub fn create_experiment(&self, config: ExperimentConfig) -> Experiment {
        let experiment = Experiment {
            id: config.id.unwrap_or_else(generate_experiment_id),
            name: config.name,
            description: config.description,
            start: config.start.unwrap_or_else(Utc::now),
            end: config.end,
            variants: config.variants,
            traffic_split: config
                .traffic_split
                .unwrap_or_else(|| self.default_traffic_split.clone()),
            success_metrics: config
                .success_metrics
                .unwrap_or_else(|| self.default_success_metrics.clone()),
            status: ExperimentStatus::Active,
        };

        if experiment.traffic_split.len() != experiment.variants.len() {
            warn!(
                "Experiment {}: traffic split has {} entries for {} variants; \
                 users past the cumulative range fall back to the first variant",
                experiment.id,
                experiment.traffic_split.len(),
                experiment.variants.len()
            );
        }
        let split_sum: f64 = experiment.traffic_split.iter().sum();
        if (split_sum - 1.0).abs() > 1e-6 {
            warn!(
                "Experiment {}: traffic split sums to {} instead of 1.0",
                experiment.id, split_sum
            );
        }

        info!(
            "Created experiment {} ({}) with {} variants",
            experiment.id,
            experiment.name,
            experiment.variants.len()
        );

        let mut state = self.state.lock().unwrap();
        state.metrics.insert(experiment.id.clone(), HashMap::new());
        state
            .experiments
            .insert(experiment.id.clone(), experiment.clone());
        experiment
    }

    /// Assign a user to a variant of the given experiment.
    ///
    /// Returns None when the experiment is unknown or not active. The
    /// assignment is deterministic (hash of "user:experiment") and idempotent:
    /// once computed it is cached, which keeps users stable even if the
    /// traffic split changes mid-experiment.
    pub fn assign_variant(
        &self,
        user_id: &str,
        experiment_id: &str,
    ) -> Option<VariantAssignment> {
        let mut state = self.state.lock().unwrap();

        let experiment = state.experiments.get(experiment_id)?;
        if experiment.status != ExperimentStatus::Active {
            return None;
        }

        let key = assignment_key(user_id, experiment_id);
        if let Some(existing) = state.assignments.get(&key) {
            return Some(existing.clone());
        }

        let bucket = normalize_hash(bucket_hash(&format!("{}:{}", user_id, experiment_id)));
        let mut cumulative = 0.0;
        let mut chosen = None;
        for (variant, fraction) in experiment
            .variants
            .iter()
            .zip(experiment.traffic_split.iter())
        {
            cumulative += fraction;
            if bucket < cumulative {
                chosen = Some(variant);
                break;
            }
        }
        // Past all thresholds (split sums to < 1.0): first variant wins.
        let variant = chosen.or_else(|| experiment.variants.first())?;

        let assignment = VariantAssignment {
            user_id: user_id.to_string(),
            experiment_id: experiment_id.to_string(),
            variant_id: variant.id.clone(),
            algorithm: variant.algorithm.clone(),
            assigned_at: Utc::now(),
        };
        state.assignments.insert(key, assignment.clone());
        Some(assignment)
    }

    /// Look up an existing assignment without creating one.
    pub fn get_assignment(
        &self,
        user_id: &str,
        experiment_id: &str,
    ) -> Option<VariantAssignment> {
        self.state
            .lock()
            .unwrap()
            .assignments
            .get(&assignment_key(user_id, experiment_id))
            .cloned()
    }

    /// Record a metric sample for a variant.
    ///
    /// Recording against an unknown experiment is a silent no-op.
    pub fn record_metric(
        &self,
        experiment_id: &str,
        variant_id: &str,
        metric: &str,
        value: f64,
        user_id: Option<&str>,
    ) {
        let mut state = self.state.lock().unwrap();
        let Some(experiment_metrics) = state.metrics.get_mut(experiment_id) else {
            debug!(
                "Dropping metric '{}' for unknown experiment {}",
                metric, experiment_id
            );
            return;
        };

        let sample = MetricSample {
            variant_id: variant_id.to_string(),
            metric: metric.to_string(),
            value,
            user_id: user_id.map(str::to_string),
            timestamp: Utc::now(),
        };
        experiment_metrics
            .entry(metric_key(variant_id, metric))
            .or_default()
            .push(sample);
    }

    /// Aggregate results for one experiment, or None if it is unknown.
    pub fn get_results(&self, experiment_id: &str) -> Option<ExperimentResults> {
        let state = self.state.lock().unwrap();
        let experiment = state.experiments.get(experiment_id)?.clone();
        let experiment_metrics = state.metrics.get(experiment_id)?;

        let total_users = state
            .assignments
            .values()
            .filter(|a| a.experiment_id == experiment_id)
            .count();

        let mut metrics: HashMap<String, HashMap<String, MetricStats>> = HashMap::new();
        for (key, samples) in experiment_metrics {
            let Some((variant_id, metric)) = key.split_once(':') else {
                continue;
            };
            metrics
                .entry(variant_id.to_string())
                .or_default()
                .insert(metric.to_string(), compute_stats(samples));
        }

        Some(ExperimentResults {
            summary: ExperimentSummary {
                total_users,
                start: experiment.start,
                end: experiment.end,
                elapsed_days: (Utc::now() - experiment.start).num_days(),
            },
            experiment,
            metrics,
        })
    }

    /// Count of assignments belonging to the experiment. This scans all
    /// assignments across experiments; fine at in-memory scale.
    pub fn user_count(&self, experiment_id: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .assignments
            .values()
            .filter(|a| a.experiment_id == experiment_id)
            .count()
    }

    /// Active experiments sorted by id, so callers that pick "the first
    /// active experiment" get a stable choice.
    pub fn active_experiments(&self) -> Vec<Experiment> {
        let state = self.state.lock().unwrap();
        let mut active: Vec<Experiment> = state
            .experiments
            .values()
            .filter(|e| e.status == ExperimentStatus::Active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.id.cmp(&b.id));
        active
    }

    /// Change an experiment's status. Purely informational; no transition
    /// rules are enforced. Returns false if the experiment is unknown.
    pub fn set_status(&self, experiment_id: &str, status: ExperimentStatus) -> bool {
        let mut state = self.state.lock().unwrap();
        match state.experiments.get_mut(experiment_id) {
            Some(experiment) => {
                experiment.status = status;
                true
            }
            None => false,
        }
    }

    pub fn get_experiment(&self, experiment_id: &str) -> Option<Experiment> {
        self.state
            .lock()
            .unwrap()
            .experiments
            .get(experiment_id)
            .cloned()
    }

    /// Total number of stored assignments across all experiments.
    pub fn assignment_count(&self) -> usize {
        self.state.lock().unwrap().assignments.len()
    }
}
