use crate::remote::EmotionScores;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outputs of the three classifiers for one captured frame.
/// Each field is independent: one classifier failing leaves the others intact.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Emotion scores of the detected face; `None` for no face or a failed call
    pub expression: Option<EmotionScores>,
    pub eye_contact_score: Option<f64>,
    pub gesture_label: Option<String>,
}

impl ClassificationResult {
    pub fn new(
        expression: Option<EmotionScores>,
        eye_contact_score: Option<f64>,
        gesture_label: Option<String>,
    ) -> Self {
        Self {
            expression,
            eye_contact_score,
            gesture_label,
        }
    }

    /// Result used when nothing could be classified this cycle
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Judgment that drives the feedback indicators during Recording
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackDecision {
    pub bad_expression: bool,
    pub bad_eye_contact: bool,
    pub bad_gesture: bool,
    pub disconnected_or_no_face: bool,
}

impl FeedbackDecision {
    /// Expression overlay: bad expression or no usable face
    pub fn expression_alert(&self) -> bool {
        self.bad_expression || self.disconnected_or_no_face
    }
}

/// One row of the presentation report, emitted per Recording cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    pub timestamp: DateTime<Utc>,
    pub image_url: String,
    pub eye_contact_score: Option<f64>,
    pub dominant_emotion: String,
    pub gesture_label: Option<String>,
}
