//! Recommendation orchestrator.
//!
//! Composes the feature store, feedback processor, and experiment framework
//! into one recommendation + feedback pipeline with a registry of named
//! algorithm implementations.

mod algorithms;

pub use algorithms::{
    PlaceholderAlgorithm, RecommendationAlgorithm, RecommendationRequest, Recommendations,
    ScoredTrack,
};

use crate::config::EngineConfig;
use crate::experiments::ExperimentFramework;
use crate::feature_store::{FeatureStore, InMemoryFeatureStore, ValidationError};
use crate::feedback::{
    FeedbackEvent, FeedbackEventInput, FeedbackEventType, FeedbackNotification, FeedbackProcessor,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Errors surfaced by the orchestrator.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Requesting an unregistered algorithm is a configuration defect, not a
    /// data-lookup miss, so it fails hard.
    #[error("Algorithm '{0}' is not registered")]
    AlgorithmNotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Snapshot of engine state for status display. Pure read, no side effects.
#[derive(Debug, Clone, Serialize)]
pub struct EngineHealth {
    pub track_vectors: usize,
    pub user_vectors: usize,
    pub events: usize,
    pub feedback_aggregates: usize,
    pub active_experiments: usize,
    pub assignments: usize,
    pub algorithms: Vec<String>,
}

/// The recommendation engine: owns the component stores and the algorithm
/// registry. Construct once at process start and share by reference.
pub struct RecommendationEngine {
    features: Arc<dyn FeatureStore>,
    feedback: FeedbackProcessor,
    experiments: ExperimentFramework,
    algorithms: Mutex<HashMap<String, Arc<dyn RecommendationAlgorithm>>>,
    default_algorithm: String,
}

impl RecommendationEngine {
    /// Build an engine with an in-memory feature store and the default
    /// placeholder algorithms registered.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_feature_store(config, Arc::new(InMemoryFeatureStore::new()))
    }

    /// Build an engine on top of a caller-provided feature store backend.
    pub fn with_feature_store(config: EngineConfig, features: Arc<dyn FeatureStore>) -> Self {
        let engine = Self {
            features,
            feedback: FeedbackProcessor::new(config.notification_capacity),
            experiments: ExperimentFramework::new(
                config.default_traffic_split,
                config.default_success_metrics,
            ),
            algorithms: Mutex::new(HashMap::new()),
            default_algorithm: config.default_algorithm,
        };

        engine.register_algorithm(Arc::new(PlaceholderAlgorithm::collaborative()));
        engine.register_algorithm(Arc::new(PlaceholderAlgorithm::content_based()));
        engine.register_algorithm(Arc::new(PlaceholderAlgorithm::hybrid()));
        info!(
            "Recommendation engine ready, default algorithm '{}'",
            engine.default_algorithm
        );
        engine
    }

    /// Register an algorithm under its name, silently replacing any previous
    /// registration of the same name.
    pub fn register_algorithm(&self, algorithm: Arc<dyn RecommendationAlgorithm>) {
        let name = algorithm.name().to_string();
        self.algorithms.lock().unwrap().insert(name, algorithm);
    }

    /// Generate recommendations for a user.
    ///
    /// When an experiment is active the user's variant decides the algorithm
    /// (first active experiment by lowest id); otherwise the request's
    /// algorithm or the configured default is used. The result carries the
    /// variant assignment when one was involved.
    pub fn recommend(
        &self,
        user_id: &str,
        request: &RecommendationRequest,
    ) -> Result<Recommendations, EngineError> {
        let assignment = self
            .experiments
            .active_experiments()
            .first()
            .and_then(|experiment| self.experiments.assign_variant(user_id, &experiment.id));

        let algorithm_name = match &assignment {
            Some(assignment) => assignment.algorithm.clone(),
            None => request
                .algorithm
                .clone()
                .unwrap_or_else(|| self.default_algorithm.clone()),
        };

        let algorithm = self
            .algorithms
            .lock()
            .unwrap()
            .get(&algorithm_name)
            .cloned()
            .ok_or_else(|| EngineError::AlgorithmNotFound(algorithm_name.clone()))?;

        let mut result = algorithm.generate(user_id, request);
        result.experiment = assignment;
        Ok(result)
    }

    /// Ingest a feedback event and forward experiment metrics.
    ///
    /// When the ingested event names the algorithm that produced the
    /// recommendation, active experiments are scanned for a matching
    /// assignment; the first match (lowest experiment id, the same order the
    /// recommend side uses) receives the sample and the scan stops there. A
    /// matching recommendation_clicked event records a click-through sample
    /// of 1.0 for that variant. Other event types are not forwarded to
    /// experiment metrics.
    pub fn process_feedback(
        &self,
        input: FeedbackEventInput,
    ) -> Result<FeedbackEvent, EngineError> {
        let event = self.feedback.ingest(input)?;

        if let Some(algorithm_used) = &event.context.algorithm_used {
            for experiment in self.experiments.active_experiments() {
                let Some(assignment) = self.experiments.get_assignment(&event.user_id, &experiment.id)
                else {
                    continue;
                };
                if &assignment.algorithm != algorithm_used {
                    continue;
                }
                if event.event_type == FeedbackEventType::RecommendationClicked {
                    debug!(
                        "Recording ctr click for user {} in experiment {}",
                        event.user_id, experiment.id
                    );
                    self.experiments.record_metric(
                        &experiment.id,
                        &assignment.variant_id,
                        "ctr",
                        1.0,
                        Some(&event.user_id),
                    );
                }
                // One matching experiment gets the sample; lowest id wins.
                break;
            }
        }

        Ok(event)
    }

    /// Subscribe to feedback notifications.
    pub fn subscribe_feedback(&self) -> broadcast::Receiver<FeedbackNotification> {
        self.feedback.subscribe()
    }

    /// Health snapshot of all components.
    pub fn health(&self) -> EngineHealth {
        let mut algorithms: Vec<String> =
            self.algorithms.lock().unwrap().keys().cloned().collect();
        algorithms.sort();

        EngineHealth {
            track_vectors: self.features.track_count(),
            user_vectors: self.features.user_count(),
            events: self.feedback.event_count(),
            feedback_aggregates: self.feedback.aggregate_count(),
            active_experiments: self.experiments.active_experiments().len(),
            assignments: self.experiments.assignment_count(),
            algorithms,
        }
    }

    /// Direct access to the feature vector store.
    pub fn features(&self) -> &Arc<dyn FeatureStore> {
        &self.features
    }

    /// Direct access to the feedback processor.
    pub fn feedback(&self) -> &FeedbackProcessor {
        &self.feedback
    }

    /// Direct access to the experiment framework.
    pub fn experiments(&self) -> &ExperimentFramework {
        &self.experiments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_algorithms_registered() {
        let engine = RecommendationEngine::new(EngineConfig::default());
        let health = engine.health();
        assert_eq!(
            health.algorithms,
            vec!["collaborative", "content_based", "hybrid"]
        );
    }

    #[test]
    fn test_recommend_uses_default_algorithm() {
        let engine = RecommendationEngine::new(EngineConfig::default());
        let result = engine
            .recommend("user-1", &RecommendationRequest::default())
            .unwrap();
        assert_eq!(result.algorithm, "collaborative");
        assert!(result.placeholder);
        assert!(result.experiment.is_none());
    }

    #[test]
    fn test_recommend_unregistered_algorithm_fails() {
        let engine = RecommendationEngine::new(EngineConfig::default());
        let request = RecommendationRequest {
            algorithm: Some("nonexistent".to_string()),
            ..Default::default()
        };
        let err = engine.recommend("user-1", &request).unwrap_err();
        assert!(matches!(err, EngineError::AlgorithmNotFound(name) if name == "nonexistent"));
    }

    #[test]
    fn test_register_algorithm_overwrites_silently() {
        struct Fixed;
        impl RecommendationAlgorithm for Fixed {
            fn name(&self) -> &str {
                "collaborative"
            }
            fn generate(&self, _: &str, _: &RecommendationRequest) -> Recommendations {
                Recommendations {
                    tracks: vec![ScoredTrack {
                        track_id: "T1".to_string(),
                        score: 0.9,
                    }],
                    algorithm: "collaborative".to_string(),
                    confidence: 0.9,
                    placeholder: false,
                    experiment: None,
                }
            }
        }

        let engine = RecommendationEngine::new(EngineConfig::default());
        engine.register_algorithm(Arc::new(Fixed));
        let result = engine
            .recommend("user-1", &RecommendationRequest::default())
            .unwrap();
        assert!(!result.placeholder);
        assert_eq!(result.tracks.len(), 1);
    }

    #[cfg(feature = "mock")]
    #[test]
    fn test_health_reads_counts_from_custom_feature_store() {
        use crate::feature_store::MockFeatureStore;

        let mut store = MockFeatureStore::new();
        store.expect_track_count().return_const(7usize);
        store.expect_user_count().return_const(3usize);

        let engine =
            RecommendationEngine::with_feature_store(EngineConfig::default(), Arc::new(store));
        let health = engine.health();
        assert_eq!(health.track_vectors, 7);
        assert_eq!(health.user_vectors, 3);
    }
}
