//! FeatureStore trait definition.
//!
//! Abstracts feature vector storage so the engine can run against the
//! in-memory implementation or a persistent backend added later.

use super::models::{TrackFeatures, UserFeatures};
use super::validation::ValidationResult;

/// Trait for feature vector storage backends.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait FeatureStore: Send + Sync {
    /// Validate and store a track feature vector, replacing any prior value
    /// for the same track id. Returns the stored vector with its refreshed
    /// `updated_at` timestamp.
    fn upsert_track(&self, track: TrackFeatures) -> ValidationResult<TrackFeatures>;

    /// Validate and store a user feature vector, replacing any prior value
    /// for the same user id.
    fn upsert_user(&self, user: UserFeatures) -> ValidationResult<UserFeatures>;

    /// Get a track feature vector by id. No side effects.
    fn get_track(&self, track_id: &str) -> Option<TrackFeatures>;

    /// Get a user feature vector by id. No side effects.
    fn get_user(&self, user_id: &str) -> Option<UserFeatures>;

    /// Cosine similarity between the audio features of two tracks.
    ///
    /// Returns 0.0 when either track is unknown or either feature vector has
    /// zero magnitude; an unknown track is not an error.
    fn track_similarity(&self, track_id_1: &str, track_id_2: &str) -> f64;

    /// Number of stored track vectors (for health reporting).
    fn track_count(&self) -> usize;

    /// Number of stored user vectors (for health reporting).
    fn user_count(&self) -> usize;
}
