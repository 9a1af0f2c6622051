//! Feedback event and aggregate models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type of user interaction being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackEventType {
    /// A recommendation was displayed to the user.
    RecommendationShown,
    /// The user clicked a recommendation.
    RecommendationClicked,
    /// The user skipped a recommended track.
    RecommendationSkipped,
    TrackLiked,
    TrackDisliked,
    TrackAddedToPlaylist,
    TrackCompleted,
    TrackRepeated,
}

impl FeedbackEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackEventType::RecommendationShown => "recommendation_shown",
            FeedbackEventType::RecommendationClicked => "recommendation_clicked",
            FeedbackEventType::RecommendationSkipped => "recommendation_skipped",
            FeedbackEventType::TrackLiked => "track_liked",
            FeedbackEventType::TrackDisliked => "track_disliked",
            FeedbackEventType::TrackAddedToPlaylist => "track_added_to_playlist",
            FeedbackEventType::TrackCompleted => "track_completed",
            FeedbackEventType::TrackRepeated => "track_repeated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "recommendation_shown" => Some(FeedbackEventType::RecommendationShown),
            "recommendation_clicked" => Some(FeedbackEventType::RecommendationClicked),
            "recommendation_skipped" => Some(FeedbackEventType::RecommendationSkipped),
            "track_liked" => Some(FeedbackEventType::TrackLiked),
            "track_disliked" => Some(FeedbackEventType::TrackDisliked),
            "track_added_to_playlist" => Some(FeedbackEventType::TrackAddedToPlaylist),
            "track_completed" => Some(FeedbackEventType::TrackCompleted),
            "track_repeated" => Some(FeedbackEventType::TrackRepeated),
            _ => None,
        }
    }
}

/// Context the event was produced in: which algorithm recommended the track,
/// where it sat in the list, and optional user environment details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    /// Name of the algorithm that produced the recommendation, if any.
    pub algorithm_used: Option<String>,
    /// 1-based position of the track in the recommendation list.
    pub position: Option<u32>,
    /// Score the recommender attached to the track, in [0,1].
    pub recommendation_score: Option<f64>,
    pub device_type: Option<String>,
    pub location: Option<String>,
    pub time_of_day: Option<String>,
}

/// Caller-supplied event data; missing id/timestamp are filled in at ingestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackEventInput {
    pub event_id: Option<String>,
    pub user_id: String,
    pub session_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub event_type: Option<FeedbackEventType>,
    pub track_id: String,
    #[serde(default)]
    pub context: EventContext,
    pub metadata: Option<serde_json::Value>,
}

/// An immutable record of one user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub event_id: String,
    pub user_id: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: FeedbackEventType,
    pub track_id: String,
    pub context: EventContext,
    pub metadata: Option<serde_json::Value>,
}

/// Mutable per-(user, track) rollup derived from the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedFeedback {
    pub user_id: String,
    pub track_id: String,
    /// All contributing events, in arrival order.
    pub events: Vec<FeedbackEvent>,
    /// Behavioral rating inferred from the events, clamped to [0,1].
    pub implicit_rating: f64,
    /// 1 after a like, 0 after a dislike, None before either.
    pub explicit_rating: Option<u8>,
    pub last_event_at: DateTime<Utc>,
}

/// Notification published to observers on every ingestion outcome.
#[derive(Debug, Clone)]
pub enum FeedbackNotification {
    /// A raw event passed validation and was recorded.
    EventIngested(FeedbackEvent),
    /// The (user, track) aggregate was created or updated.
    FeedbackUpdated(AggregatedFeedback),
    /// An event failed validation; carries the cause description.
    EventError(String),
}
