use super::*;
use crate::config::PodiumConfig;
use crate::remote::EmotionScores;
use chrono::Utc;

fn aggregator() -> ClassificationAggregator {
    ClassificationAggregator::new(&PodiumConfig::default().classification)
}

fn emotions(pairs: &[(&str, f64)]) -> EmotionScores {
    pairs
        .iter()
        .map(|(label, score)| (label.to_string(), *score))
        .collect()
}

fn good_result() -> ClassificationResult {
    ClassificationResult::new(
        Some(emotions(&[("happiness", 0.9), ("anger", 0.1)])),
        Some(0.9),
        Some("stand_properly".to_string()),
    )
}

#[test]
fn test_all_good() {
    let decision = aggregator().decide(&good_result());
    assert_eq!(decision, FeedbackDecision::default());
    assert!(!decision.expression_alert());
}

#[test]
fn test_bad_expression_sum_exceeds_threshold() {
    let result = ClassificationResult {
        expression: Some(emotions(&[("anger", 0.3), ("sadness", 0.3), ("happiness", 0.4)])),
        ..good_result()
    };
    let decision = aggregator().decide(&result);
    assert!(decision.bad_expression);
    assert!(!decision.disconnected_or_no_face);

    // Max score wins even though it is outside the bad set
    assert_eq!(dominant_emotion(result.expression.as_ref()), "happiness");
}

#[test]
fn test_bad_expression_sum_at_threshold_is_not_bad() {
    let result = ClassificationResult {
        expression: Some(emotions(&[("fear", 0.25), ("disgust", 0.25), ("neutral", 0.5)])),
        ..good_result()
    };
    assert!(!aggregator().decide(&result).bad_expression);
}

#[test]
fn test_no_face_is_bad_regardless_of_other_results() {
    for (eye, gesture) in [
        (Some(0.95), Some("stand_properly")),
        (Some(0.1), Some("point")),
        (None, None),
    ] {
        let result = ClassificationResult::new(None, eye, gesture.map(str::to_string));
        let decision = aggregator().decide(&result);
        assert!(decision.disconnected_or_no_face);
        assert!(decision.bad_expression);
        assert!(decision.expression_alert());
    }
}

#[test]
fn test_eye_contact_threshold_is_strict() {
    let at_threshold = ClassificationResult {
        eye_contact_score: Some(0.7),
        ..good_result()
    };
    assert!(!aggregator().decide(&at_threshold).bad_eye_contact);

    let below = ClassificationResult {
        eye_contact_score: Some(0.699),
        ..good_result()
    };
    assert!(aggregator().decide(&below).bad_eye_contact);
}

#[test]
fn test_gesture_membership() {
    let point = ClassificationResult {
        gesture_label: Some("point".to_string()),
        ..good_result()
    };
    assert!(aggregator().decide(&point).bad_gesture);

    let proper = ClassificationResult {
        gesture_label: Some("stand_properly".to_string()),
        ..good_result()
    };
    assert!(!aggregator().decide(&proper).bad_gesture);
}

#[test]
fn test_missing_results_fall_back_to_bad() {
    let decision = aggregator().decide(&ClassificationResult::empty());
    assert_eq!(
        decision,
        FeedbackDecision {
            bad_expression: true,
            bad_eye_contact: true,
            bad_gesture: true,
            disconnected_or_no_face: true,
        }
    );
}

#[test]
fn test_dominant_emotion_without_mapping() {
    assert_eq!(dominant_emotion(None), NO_EMOTION);
    assert_eq!(dominant_emotion(Some(&EmotionScores::new())), NO_EMOTION);
}

#[test]
fn test_dominant_emotion_tie_picks_first_label() {
    let emotions = EmotionScores::from([
        ("sadness".to_string(), 0.4),
        ("anger".to_string(), 0.4),
        ("neutral".to_string(), 0.2),
    ]);
    assert_eq!(dominant_emotion(Some(&emotions)), "anger");

    let all_equal = EmotionScores::from([
        ("surprise".to_string(), 0.25),
        ("fear".to_string(), 0.25),
        ("happiness".to_string(), 0.25),
    ]);
    assert_eq!(dominant_emotion(Some(&all_equal)), "fear");
}

#[test]
fn test_report_record() {
    let result = ClassificationResult::new(
        Some(emotions(&[("anger", 0.6)])),
        Some(0.5),
        Some("cross_arms".to_string()),
    );
    let now = Utc::now();
    let report = aggregator().report(now, "https://img/u.jpg".to_string(), &result);

    assert_eq!(report.timestamp, now);
    assert_eq!(report.image_url, "https://img/u.jpg");
    assert_eq!(report.eye_contact_score, Some(0.5));
    assert_eq!(report.dominant_emotion, "anger");
    assert_eq!(report.gesture_label.as_deref(), Some("cross_arms"));
}

#[test]
fn test_expression_label_sets() {
    let aggregator = aggregator();
    assert!(aggregator.is_good_expression("neutral"));
    assert!(!aggregator.is_good_expression("contempt"));
    let scores = emotions(&[("contempt", 0.2), ("fear", 0.1), ("surprise", 0.7)]);
    assert!((aggregator.bad_expression_score(&scores) - 0.3).abs() < 1e-9);
}
