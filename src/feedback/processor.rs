//! Feedback event processor.
//!
//! Validates and records interaction events, maintains the per-(user, track)
//! aggregates, and publishes notifications to subscribed observers.

use super::models::{
    AggregatedFeedback, FeedbackEvent, FeedbackEventInput, FeedbackEventType, FeedbackNotification,
};
use crate::feature_store::{ValidationError, ValidationResult};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

/// New aggregates start at the neutral midpoint before the first adjustment.
const INITIAL_IMPLICIT_RATING: f64 = 0.5;

/// Per-event adjustment applied to the implicit rating, clamped to [0,1]
/// after every event. Shown and added-to-playlist events are recorded in the
/// interaction history only.
fn implicit_adjustment(event_type: FeedbackEventType) -> f64 {
    match event_type {
        FeedbackEventType::TrackLiked => 0.3,
        FeedbackEventType::TrackDisliked => -0.5,
        FeedbackEventType::TrackCompleted => 0.2,
        FeedbackEventType::TrackRepeated => 0.4,
        FeedbackEventType::RecommendationSkipped => -0.1,
        FeedbackEventType::RecommendationClicked => 0.1,
        FeedbackEventType::RecommendationShown | FeedbackEventType::TrackAddedToPlaylist => 0.0,
    }
}

struct FeedbackState {
    /// Append-only log of every ingested event.
    events: Vec<FeedbackEvent>,
    /// Aggregates keyed by "user_id:track_id".
    aggregates: HashMap<String, AggregatedFeedback>,
}

/// Validates, records, and aggregates feedback events.
pub struct FeedbackProcessor {
    state: Mutex<FeedbackState>,
    notifications: broadcast::Sender<FeedbackNotification>,
}

fn aggregate_key(user_id: &str, track_id: &str) -> String {
    format!("{}:{}", user_id, track_id)
}

fn generate_event_id() -> String {
    // Process-unique, not meaningfully guessable: wall clock plus randomness.
    format!(
        "evt_{}_{:08x}",
        Utc::now().timestamp_millis(),
        rand::random::<u32>()
    )
}

fn validate_event(event: &FeedbackEvent) -> ValidationResult<()> {
    if event.user_id.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "user_id" });
    }
    if event.session_id.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "session_id" });
    }
    if event.track_id.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "track_id" });
    }
    if let Some(position) = event.context.position {
        if position < 1 {
            return Err(ValidationError::NonPositiveValue {
                field: "context.position",
                value: position as f64,
            });
        }
    }
    if let Some(score) = event.context.recommendation_score {
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(ValidationError::OutOfRange {
                field: "context.recommendation_score".to_string(),
                value: score,
                min: 0.0,
                max: 1.0,
            });
        }
    }
    Ok(())
}

impl FeedbackProcessor {
    pub fn new(notification_capacity: usize) -> Self {
        let (notifications, _) = broadcast::channel(notification_capacity);
        Self {
            state: Mutex::new(FeedbackState {
                events: Vec::new(),
                aggregates: HashMap::new(),
            }),
            notifications,
        }
    }

    /// Subscribe to ingestion notifications. Multiple independent listeners
    /// can attach; each gets its own receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedbackNotification> {
        self.notifications.subscribe()
    }

    /// Ingest one feedback event.
    ///
    /// Missing event id and timestamp are generated. On validation failure an
    /// `EventError` notification is published and the error returned. On
    /// success the event is appended to the log, the (user, track) aggregate
    /// is created or updated, and `FeedbackUpdated` then `EventIngested`
    /// notifications are published. The whole ingestion happens under one
    /// lock so concurrent callers cannot interleave aggregate updates.
    pub fn ingest(&self, input: FeedbackEventInput) -> ValidationResult<FeedbackEvent> {
        let Some(event_type) = input.event_type else {
            let err = ValidationError::EmptyField {
                field: "event_type",
            };
            self.notify(FeedbackNotification::EventError(err.to_string()));
            return Err(err);
        };

        let event = FeedbackEvent {
            event_id: input.event_id.unwrap_or_else(generate_event_id),
            user_id: input.user_id,
            session_id: input.session_id,
            timestamp: input.timestamp.unwrap_or_else(Utc::now),
            event_type,
            track_id: input.track_id,
            context: input.context,
            metadata: input.metadata,
        };

        if let Err(err) = validate_event(&event) {
            self.notify(FeedbackNotification::EventError(err.to_string()));
            return Err(err);
        }

        let aggregate = {
            let mut state = self.state.lock().unwrap();
            state.events.push(event.clone());

            let key = aggregate_key(&event.user_id, &event.track_id);
            let aggregate = state
                .aggregates
                .entry(key)
                .or_insert_with(|| AggregatedFeedback {
                    user_id: event.user_id.clone(),
                    track_id: event.track_id.clone(),
                    events: Vec::new(),
                    implicit_rating: INITIAL_IMPLICIT_RATING,
                    explicit_rating: None,
                    last_event_at: event.timestamp,
                });

            aggregate.events.push(event.clone());
            match event.event_type {
                FeedbackEventType::TrackLiked => aggregate.explicit_rating = Some(1),
                FeedbackEventType::TrackDisliked => aggregate.explicit_rating = Some(0),
                _ => {}
            }
            aggregate.implicit_rating = (aggregate.implicit_rating
                + implicit_adjustment(event.event_type))
            .clamp(0.0, 1.0);
            aggregate.last_event_at = event.timestamp;
            aggregate.clone()
        };

        debug!(
            "Ingested {} event for user {} on track {}",
            event.event_type.as_str(),
            event.user_id,
            event.track_id
        );

        self.notify(FeedbackNotification::FeedbackUpdated(aggregate));
        self.notify(FeedbackNotification::EventIngested(event.clone()));
        Ok(event)
    }

    /// Get the aggregate for one (user, track) pair.
    pub fn get_feedback(&self, user_id: &str, track_id: &str) -> Option<AggregatedFeedback> {
        self.state
            .lock()
            .unwrap()
            .aggregates
            .get(&aggregate_key(user_id, track_id))
            .cloned()
    }

    /// Get every aggregate for one user. Order is not guaranteed.
    pub fn get_user_feedback(&self, user_id: &str) -> Vec<AggregatedFeedback> {
        self.state
            .lock()
            .unwrap()
            .aggregates
            .values()
            .filter(|aggregate| aggregate.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Total number of ingested events.
    pub fn event_count(&self) -> usize {
        self.state.lock().unwrap().events.len()
    }

    /// Number of (user, track) aggregates.
    pub fn aggregate_count(&self) -> usize {
        self.state.lock().unwrap().aggregates.len()
    }

    fn notify(&self, notification: FeedbackNotification) {
        // Send fails only when no subscriber exists, which is fine.
        let _ = self.notifications.send(notification);
    }
}
