//! Pure mapping from device state and feedback to indicator writes

use super::indicator::{Indicator, IndicatorWrite, Level};
use crate::feedback::FeedbackDecision;
use crate::state::DeviceState;

/// Levels of the state indicators (white, red) for `state`
pub fn steady_writes(state: DeviceState) -> [IndicatorWrite; 2] {
    let (white, red) = match state {
        DeviceState::Standby | DeviceState::Reporting => (Level::High, Level::Low),
        DeviceState::Recording => (Level::Low, Level::High),
        DeviceState::Disconnected => (Level::Low, Level::Low),
    };

    [
        IndicatorWrite::new(Indicator::White, white),
        IndicatorWrite::new(Indicator::Red, red),
    ]
}

/// Feedback overlays for a Recording cycle
pub fn feedback_writes(decision: &FeedbackDecision) -> [IndicatorWrite; 3] {
    [
        IndicatorWrite::new(Indicator::Yellow, Level::from_bool(decision.bad_eye_contact)),
        IndicatorWrite::new(Indicator::Green, Level::from_bool(decision.bad_gesture)),
        IndicatorWrite::new(Indicator::Blue, Level::from_bool(decision.expression_alert())),
    ]
}

/// Full write set for a cycle. Every indicator is written so re-applying
/// the same plan is idempotent. Feedback only shows while Recording.
pub fn plan(state: DeviceState, decision: Option<&FeedbackDecision>) -> [IndicatorWrite; 5] {
    let [white, red] = steady_writes(state);

    let cleared = FeedbackDecision::default();
    let overlay = match (state, decision) {
        (DeviceState::Recording, Some(decision)) => decision,
        _ => &cleared,
    };
    let [yellow, green, blue] = feedback_writes(overlay);

    [white, red, yellow, green, blue]
}
