//! Recommendation algorithm trait and the default placeholder implementations.

use serde::{Deserialize, Serialize};

use crate::experiments::VariantAssignment;

/// Options for one recommendation request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationRequest {
    /// Algorithm to use when no experiment decides for us.
    pub algorithm: Option<String>,
    /// Maximum number of tracks wanted; 0 means "algorithm default".
    pub limit: usize,
    /// Free-form request context passed through to the algorithm.
    pub context: Option<serde_json::Value>,
}

/// One recommended track with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTrack {
    pub track_id: String,
    pub score: f64,
}

/// Result of one recommendation run.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub tracks: Vec<ScoredTrack>,
    pub algorithm: String,
    pub confidence: f64,
    /// True for stub algorithms that return no real results.
    pub placeholder: bool,
    /// Present when an active experiment decided the algorithm.
    pub experiment: Option<VariantAssignment>,
}

/// A named recommendation algorithm.
pub trait RecommendationAlgorithm: Send + Sync {
    fn name(&self) -> &str;

    /// Produce recommendations for the user. Implementations must not fail on
    /// unknown users; an empty track list is a valid answer.
    fn generate(&self, user_id: &str, request: &RecommendationRequest) -> Recommendations;
}

/// Placeholder implementation: fixed confidence, empty track list.
///
/// Stands in for collaborative filtering / content-based scoring until a real
/// model is wired behind the trait.
pub struct PlaceholderAlgorithm {
    name: &'static str,
    confidence: f64,
}

impl PlaceholderAlgorithm {
    pub fn collaborative() -> Self {
        Self {
            name: "collaborative",
            confidence: 0.5,
        }
    }

    pub fn content_based() -> Self {
        Self {
            name: "content_based",
            confidence: 0.5,
        }
    }

    pub fn hybrid() -> Self {
        Self {
            name: "hybrid",
            confidence: 0.5,
        }
    }
}

impl RecommendationAlgorithm for PlaceholderAlgorithm {
    fn name(&self) -> &str {
        self.name
    }

    fn generate(&self, _user_id: &str, _request: &RecommendationRequest) -> Recommendations {
        Recommendations {
            tracks: Vec::new(),
            algorithm: self.name.to_string(),
            confidence: self.confidence,
            placeholder: true,
            experiment: None,
        }
    }
}
