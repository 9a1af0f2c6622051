//! Validation for feature vectors.
//!
//! Every upsert goes through these functions before anything is stored, so
//! the store never holds a vector that violates its declared bounds.

use super::models::{TrackFeatures, UserFeatures, EMBEDDING_LEN, MOOD_VECTOR_LEN};
use std::collections::HashMap;
use std::fmt;

/// Validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyField {
        field: &'static str,
    },
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
    NonPositiveValue {
        field: &'static str,
        value: f64,
    },
    BadLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyField { field } => {
                write!(f, "Field '{}' is required but was empty", field)
            }
            ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "Field '{}' must be within [{}, {}], got {}",
                    field, min, max, value
                )
            }
            ValidationError::NonPositiveValue { field, value } => {
                write!(f, "Field '{}' must be positive, got {}", field, value)
            }
            ValidationError::BadLength {
                field,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Field '{}' must have exactly {} entries, got {}",
                    field, expected, actual
                )
            }
            ValidationError::InvertedRange { field, min, max } => {
                write!(
                    f,
                    "Field '{}' range is inverted: min {} exceeds max {}",
                    field, min, max
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_unit_interval(field: &str, value: f64) -> ValidationResult<()> {
    check_range(field, value, 0.0, 1.0)
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> ValidationResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_weight_map(field_prefix: &str, map: &HashMap<String, f64>) -> ValidationResult<()> {
    for (key, value) in map {
        check_unit_interval(&format!("{}.{}", field_prefix, key), *value)?;
    }
    Ok(())
}

/// Validate a track feature vector.
pub fn validate_track(track: &TrackFeatures) -> ValidationResult<()> {
    if track.track_id.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "track_id" });
    }

    let audio = &track.audio;
    check_unit_interval("acousticness", audio.acousticness)?;
    check_unit_interval("danceability", audio.danceability)?;
    check_unit_interval("energy", audio.energy)?;
    check_unit_interval("instrumentalness", audio.instrumentalness)?;
    check_unit_interval("liveness", audio.liveness)?;
    check_unit_interval("speechiness", audio.speechiness)?;
    check_unit_interval("valence", audio.valence)?;
    if !audio.loudness.is_finite() {
        return Err(ValidationError::OutOfRange {
            field: "loudness".to_string(),
            value: audio.loudness,
            min: f64::MIN,
            max: f64::MAX,
        });
    }
    if !(audio.tempo > 0.0) {
        return Err(ValidationError::NonPositiveValue {
            field: "tempo",
            value: audio.tempo,
        });
    }
    check_range("key", audio.key as f64, 0.0, 11.0)?;
    check_range("mode", audio.mode as f64, 0.0, 1.0)?;
    check_range("time_signature", audio.time_signature as f64, 1.0, 7.0)?;

    let metadata = &track.metadata;
    if metadata.artist_id.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "artist_id" });
    }
    if metadata.album_id.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "album_id" });
    }
    check_range("popularity", metadata.popularity as f64, 0.0, 100.0)?;
    if metadata.duration_ms == 0 {
        return Err(ValidationError::NonPositiveValue {
            field: "duration_ms",
            value: 0.0,
        });
    }

    if let Some(embedding) = &track.embedding {
        if embedding.len() != EMBEDDING_LEN {
            return Err(ValidationError::BadLength {
                field: "embedding",
                expected: EMBEDDING_LEN,
                actual: embedding.len(),
            });
        }
    }
    if let Some(genre_similarity) = &track.genre_similarity {
        check_weight_map("genre_similarity", genre_similarity)?;
    }
    if let Some(mood_vector) = &track.mood_vector {
        if mood_vector.len() != MOOD_VECTOR_LEN {
            return Err(ValidationError::BadLength {
                field: "mood_vector",
                expected: MOOD_VECTOR_LEN,
                actual: mood_vector.len(),
            });
        }
    }

    Ok(())
}

/// Validate a user feature vector.
pub fn validate_user(user: &UserFeatures) -> ValidationResult<()> {
    if user.user_id.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "user_id" });
    }

    check_weight_map("genre_preferences", &user.genre_preferences)?;

    let prefs = &user.audio_preferences;
    check_unit_interval("audio_preferences.energy", prefs.energy)?;
    check_unit_interval("audio_preferences.danceability", prefs.danceability)?;
    check_unit_interval("audio_preferences.valence", prefs.valence)?;
    check_unit_interval("audio_preferences.acousticness", prefs.acousticness)?;

    let tempo = &user.tempo_range;
    if !(tempo.min > 0.0) {
        return Err(ValidationError::NonPositiveValue {
            field: "tempo_range.min",
            value: tempo.min,
        });
    }
    if !(tempo.max > 0.0) {
        return Err(ValidationError::NonPositiveValue {
            field: "tempo_range.max",
            value: tempo.max,
        });
    }
    if tempo.min > tempo.max {
        return Err(ValidationError::InvertedRange {
            field: "tempo_range",
            min: tempo.min,
            max: tempo.max,
        });
    }

    check_unit_interval("listening.diversity_score", user.listening.diversity_score)?;

    if let Some(map) = &user.context.time_of_day {
        check_weight_map("context.time_of_day", map)?;
    }
    if let Some(map) = &user.context.day_of_week {
        check_weight_map("context.day_of_week", map)?;
    }
    if let Some(map) = &user.context.device {
        check_weight_map("context.device", map)?;
    }

    Ok(())
}
