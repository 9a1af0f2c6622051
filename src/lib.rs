//! EchoTune Recommendation Engine Library
//!
//! In-memory recommendation scaffold: validated feature vector storage,
//! feedback event aggregation, A/B experimentation, and an orchestrator with
//! a pluggable algorithm registry.

pub mod config;
pub mod engine;
pub mod experiments;
pub mod feature_store;
pub mod feedback;

// Re-export commonly used types for convenience
pub use config::EngineConfig;
pub use engine::{
    EngineError, EngineHealth, RecommendationAlgorithm, RecommendationEngine,
    RecommendationRequest, Recommendations, ScoredTrack,
};
pub use experiments::{Experiment, ExperimentConfig, ExperimentFramework, Variant};
pub use feature_store::{FeatureStore, InMemoryFeatureStore, TrackFeatures, UserFeatures};
pub use feedback::{FeedbackEventInput, FeedbackEventType, FeedbackProcessor};
