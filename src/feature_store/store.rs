//! In-memory feature vector store.
//!
//! Vectors are validated at the write boundary and held for the process
//! lifetime; there is no expiry. A persistent backend would implement the
//! same `FeatureStore` trait.

use super::models::{TrackFeatures, UserFeatures};
use super::trait_def::FeatureStore;
use super::validation::{validate_track, validate_user, ValidationResult};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// In-memory `FeatureStore` backed by hash maps.
#[derive(Default)]
pub struct InMemoryFeatureStore {
    tracks: Mutex<HashMap<String, TrackFeatures>>,
    users: Mutex<HashMap<String, UserFeatures>>,
}

impl InMemoryFeatureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    dot / (mag_a * mag_b)
}

impl FeatureStore for InMemoryFeatureStore {
    fn upsert_track(&self, mut track: TrackFeatures) -> ValidationResult<TrackFeatures> {
        validate_track(&track)?;
        track.updated_at = Utc::now();
        let mut tracks = self.tracks.lock().unwrap();
        let replaced = tracks.insert(track.track_id.clone(), track.clone());
        if replaced.is_some() {
            debug!("Replaced feature vector for track {}", track.track_id);
        }
        Ok(track)
    }

    fn upsert_user(&self, mut user: UserFeatures) -> ValidationResult<UserFeatures> {
        validate_user(&user)?;
        user.updated_at = Utc::now();
        self.users
            .lock()
            .unwrap()
            .insert(user.user_id.clone(), user.clone());
        Ok(user)
    }

    fn get_track(&self, track_id: &str) -> Option<TrackFeatures> {
        self.tracks.lock().unwrap().get(track_id).cloned()
    }

    fn get_user(&self, user_id: &str) -> Option<UserFeatures> {
        self.users.lock().unwrap().get(user_id).cloned()
    }

    fn track_similarity(&self, track_id_1: &str, track_id_2: &str) -> f64 {
        let tracks = self.tracks.lock().unwrap();
        let (Some(a), Some(b)) = (tracks.get(track_id_1), tracks.get(track_id_2)) else {
            return 0.0;
        };
        cosine_similarity(&a.audio.as_vector(), &b.audio.as_vector())
    }

    fn track_count(&self) -> usize {
        self.tracks.lock().unwrap().len()
    }

    fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}
