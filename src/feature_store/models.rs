//! Feature vector models for tracks and user taste profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Expected length of a track embedding, when present.
pub const EMBEDDING_LEN: usize = 128;

/// Expected length of a mood vector, when present.
pub const MOOD_VECTOR_LEN: usize = 8;

/// Normalized audio characteristics of one track.
///
/// All unit-interval fields are expected in [0,1]; `loudness` is unconstrained
/// (and in practice negative dBFS), `tempo` must be positive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub acousticness: f64,
    pub danceability: f64,
    pub energy: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub loudness: f64,
    pub speechiness: f64,
    pub valence: f64,
    pub tempo: f64,
    /// Pitch class, 0-11.
    pub key: u8,
    /// Modality: 0 minor, 1 major.
    pub mode: u8,
    /// Beats per bar, 1-7.
    pub time_signature: u8,
}

impl AudioFeatures {
    /// The ordered numeric values used for similarity computation.
    ///
    /// The order is fixed and must match for both operands of a cosine
    /// similarity: acousticness, danceability, energy, instrumentalness,
    /// liveness, loudness, speechiness, tempo, valence. Loudness is the only
    /// component that can be negative.
    pub fn as_vector(&self) -> [f64; 9] {
        [
            self.acousticness,
            self.danceability,
            self.energy,
            self.instrumentalness,
            self.liveness,
            self.loudness,
            self.speechiness,
            self.tempo,
            self.valence,
        ]
    }
}

/// Catalog metadata attached to a track's feature vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackMetadata {
    pub artist_id: String,
    pub album_id: String,
    pub genres: Vec<String>,
    pub release_year: u16,
    /// 0-100, Spotify-style popularity.
    pub popularity: u8,
    pub duration_ms: u64,
}

/// One track's complete feature vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackFeatures {
    pub track_id: String,
    pub audio: AudioFeatures,
    pub metadata: TrackMetadata,
    /// Learned embedding, fixed length of [`EMBEDDING_LEN`] when present.
    pub embedding: Option<Vec<f64>>,
    /// Similarity weights against named genres, each in [0,1].
    pub genre_similarity: Option<HashMap<String, f64>>,
    /// Fixed-length mood descriptor, [`MOOD_VECTOR_LEN`] entries.
    pub mood_vector: Option<Vec<f64>>,
    /// Stamped by the store on every upsert.
    pub updated_at: DateTime<Utc>,
}

/// A user's preferred tempo range in BPM.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TempoRange {
    pub min: f64,
    pub max: f64,
}

/// Scalar audio-feature preferences, each in [0,1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioPreferences {
    pub energy: f64,
    pub danceability: f64,
    pub valence: f64,
    pub acousticness: f64,
}

/// Aggregates over a user's listening history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ListeningAggregates {
    pub total_tracks: u64,
    pub unique_artists: u64,
    pub unique_genres: u64,
    /// 0 = single-genre listener, 1 = maximally eclectic.
    pub diversity_score: f64,
}

/// Optional contextual preference maps, values in [0,1].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextPreferences {
    pub time_of_day: Option<HashMap<String, f64>>,
    pub day_of_week: Option<HashMap<String, f64>>,
    pub device: Option<HashMap<String, f64>>,
}

/// One user's taste profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserFeatures {
    pub user_id: String,
    /// Per-genre affinity weights, each in [0,1].
    pub genre_preferences: HashMap<String, f64>,
    pub audio_preferences: AudioPreferences,
    pub tempo_range: TempoRange,
    pub listening: ListeningAggregates,
    pub context: ContextPreferences,
    /// Stamped by the store on every upsert.
    pub updated_at: DateTime<Utc>,
}
