//! Test fixture creation for the recommendation engine.

use std::sync::Arc;

use echotune_engine::engine::{
    RecommendationAlgorithm, RecommendationRequest, Recommendations, ScoredTrack,
};
use echotune_engine::experiments::{ExperimentConfig, Variant};
use echotune_engine::feature_store::{
    AudioFeatures, AudioPreferences, ContextPreferences, ListeningAggregates, TempoRange,
    TrackFeatures, TrackMetadata, UserFeatures,
};
use echotune_engine::feedback::{EventContext, FeedbackEventInput, FeedbackEventType};
use echotune_engine::{EngineConfig, RecommendationEngine};

use super::constants::*;

/// Install a test log subscriber once per test binary. Safe to call from
/// every test; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Engine with default config and the placeholder algorithms registered.
pub fn make_engine() -> RecommendationEngine {
    init_tracing();
    RecommendationEngine::new(EngineConfig::default())
}

/// A valid track feature vector with tweakable energy/valence.
pub fn make_track(id: &str, energy: f64, valence: f64) -> TrackFeatures {
    TrackFeatures {
        track_id: id.to_string(),
        audio: AudioFeatures {
            acousticness: 0.25,
            danceability: 0.65,
            energy,
            instrumentalness: 0.0,
            liveness: 0.12,
            loudness: -8.0,
            speechiness: 0.05,
            valence,
            tempo: 122.0,
            key: 4,
            mode: 1,
            time_signature: 4,
        },
        metadata: TrackMetadata {
            artist_id: "artist-1".to_string(),
            album_id: "album-1".to_string(),
            genres: vec!["electronic".to_string()],
            release_year: 2020,
            popularity: 60,
            duration_ms: 210_000,
        },
        embedding: None,
        genre_similarity: None,
        mood_vector: None,
        updated_at: chrono::Utc::now(),
    }
}

/// A valid user taste profile.
pub fn make_user(id: &str) -> UserFeatures {
    UserFeatures {
        user_id: id.to_string(),
        genre_preferences: [("electronic".to_string(), 0.8)].into_iter().collect(),
        audio_preferences: AudioPreferences {
            energy: 0.7,
            danceability: 0.6,
            valence: 0.5,
            acousticness: 0.3,
        },
        tempo_range: TempoRange {
            min: 90.0,
            max: 150.0,
        },
        listening: ListeningAggregates {
            total_tracks: 500,
            unique_artists: 120,
            unique_genres: 8,
            diversity_score: 0.35,
        },
        context: ContextPreferences::default(),
        updated_at: chrono::Utc::now(),
    }
}

/// A feedback event input for (USER_1, TRACK_1_ID) with no context.
pub fn make_event(event_type: FeedbackEventType) -> FeedbackEventInput {
    FeedbackEventInput {
        event_id: None,
        user_id: USER_1.to_string(),
        session_id: SESSION_1.to_string(),
        timestamp: None,
        event_type: Some(event_type),
        track_id: TRACK_1_ID.to_string(),
        context: EventContext::default(),
        metadata: None,
    }
}

/// Two-variant experiment config: control=collaborative, test=hybrid, 50/50.
pub fn make_experiment_config(id: &str) -> ExperimentConfig {
    ExperimentConfig {
        id: Some(id.to_string()),
        name: "ranker-experiment".to_string(),
        description: None,
        start: None,
        end: None,
        variants: vec![
            Variant {
                id: "control".to_string(),
                algorithm: "collaborative".to_string(),
            },
            Variant {
                id: "test".to_string(),
                algorithm: "hybrid".to_string(),
            },
        ],
        traffic_split: Some(vec![0.5, 0.5]),
        success_metrics: None,
    }
}

/// Algorithm returning a fixed track list, for end-to-end scenarios.
pub struct FixedListAlgorithm {
    name: &'static str,
    tracks: Vec<String>,
}

impl FixedListAlgorithm {
    pub fn hybrid(tracks: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            name: "hybrid",
            tracks,
        })
    }
}

impl RecommendationAlgorithm for FixedListAlgorithm {
    fn name(&self) -> &str {
        self.name
    }

    fn generate(&self, _user_id: &str, _request: &RecommendationRequest) -> Recommendations {
        Recommendations {
            tracks: self
                .tracks
                .iter()
                .map(|id| ScoredTrack {
                    track_id: id.clone(),
                    score: 0.8,
                })
                .collect(),
            algorithm: self.name.to_string(),
            confidence: 0.8,
            placeholder: false,
            experiment: None,
        }
    }
}
