//! Feedback event ingestion and aggregation.

mod models;
mod processor;

pub use models::{
    AggregatedFeedback, EventContext, FeedbackEvent, FeedbackEventInput, FeedbackEventType,
    FeedbackNotification,
};
pub use processor::FeedbackProcessor;
