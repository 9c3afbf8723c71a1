use super::gesture::is_known_gesture;
use super::types::{ClassificationResult, FeedbackDecision, ReportRecord};
use crate::config::ClassificationConfig;
use crate::remote::EmotionScores;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::warn;

/// Reported emotion when no expression mapping was returned
pub const NO_EMOTION: &str = "none";

/// Fixed label sets and thresholds the aggregator judges against
#[derive(Debug, Clone)]
pub struct ClassificationAggregator {
    bad_expression_threshold: f64,
    eye_contact_threshold: f64,
    good_expressions: HashSet<String>,
    bad_expressions: Vec<String>,
    bad_gestures: HashSet<String>,
}

impl ClassificationAggregator {
    pub fn new(config: &ClassificationConfig) -> Self {
        for label in &config.bad_gestures {
            if !is_known_gesture(label) {
                warn!("Bad-gesture label {} is not in the gesture vocabulary", label);
            }
        }

        Self {
            bad_expression_threshold: config.bad_expression_threshold,
            eye_contact_threshold: config.eye_contact_threshold,
            good_expressions: config.good_expressions.iter().cloned().collect(),
            bad_expressions: config.bad_expressions.clone(),
            bad_gestures: config.bad_gestures.iter().cloned().collect(),
        }
    }

    /// Combine one cycle's classifier outputs into a feedback decision.
    /// Any missing result counts as bad.
    pub fn decide(&self, result: &ClassificationResult) -> FeedbackDecision {
        let (bad_expression, no_face) = match &result.expression {
            Some(emotions) => {
                let score = self.bad_expression_score(emotions);
                (score > self.bad_expression_threshold, false)
            }
            None => (true, true),
        };

        let bad_eye_contact = result
            .eye_contact_score
            .map_or(true, |score| score < self.eye_contact_threshold);

        let bad_gesture = result
            .gesture_label
            .as_deref()
            .map_or(true, |label| self.bad_gestures.contains(label));

        FeedbackDecision {
            bad_expression,
            bad_eye_contact,
            bad_gesture,
            disconnected_or_no_face: no_face,
        }
    }

    /// Sum of the scores of the bad-expression labels; absent labels count 0
    pub fn bad_expression_score(&self, emotions: &EmotionScores) -> f64 {
        self.bad_expressions
            .iter()
            .filter_map(|label| emotions.get(label))
            .sum()
    }

    pub fn is_good_expression(&self, label: &str) -> bool {
        self.good_expressions.contains(label)
    }

    pub fn report(
        &self,
        timestamp: DateTime<Utc>,
        image_url: String,
        result: &ClassificationResult,
    ) -> ReportRecord {
        ReportRecord {
            timestamp,
            image_url,
            eye_contact_score: result.eye_contact_score,
            dominant_emotion: dominant_emotion(result.expression.as_ref()),
            gesture_label: result.gesture_label.clone(),
        }
    }
}

/// Label with the highest score, or [`NO_EMOTION`] without a mapping.
/// Ties go to the first label in label order.
pub fn dominant_emotion(emotions: Option<&EmotionScores>) -> String {
    emotions
        .and_then(|emotions| {
            emotions
                .iter()
                .filter(|(_, score)| score.is_finite())
                .reduce(|best, candidate| {
                    if candidate.1 > best.1 {
                        candidate
                    } else {
                        best
                    }
                })
                .map(|(label, _)| label.clone())
        })
        .unwrap_or_else(|| NO_EMOTION.to_string())
}
