//! Feature vector store: validated per-track and per-user feature records.

mod models;
mod store;
mod trait_def;
mod validation;

pub use models::{
    AudioFeatures, AudioPreferences, ContextPreferences, ListeningAggregates, TempoRange,
    TrackFeatures, TrackMetadata, UserFeatures, EMBEDDING_LEN, MOOD_VECTOR_LEN,
};
pub use store::InMemoryFeatureStore;
pub use trait_def::FeatureStore;
pub use validation::{validate_track, validate_user, ValidationError, ValidationResult};

#[cfg(feature = "mock")]
pub use trait_def::MockFeatureStore;
