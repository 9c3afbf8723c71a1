mod gesture;
mod rules;
mod types;
#[cfg(test)]
mod tests;

pub use gesture::{is_known_gesture, GESTURE_VOCABULARY};
pub use rules::{dominant_emotion, ClassificationAggregator, NO_EMOTION};
pub use types::{ClassificationResult, FeedbackDecision, ReportRecord};
