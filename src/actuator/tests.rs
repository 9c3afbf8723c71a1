use super::*;
use crate::config::PodiumConfig;
use crate::error::ActuationError;
use crate::feedback::FeedbackDecision;
use crate::state::DeviceState;
use std::collections::BTreeMap;
use std::sync::Arc;

fn create_test_panel() -> (ActuatorPanel, Arc<MockOutputLines>) {
    let bindings = ChannelBindings::from_config(&PodiumConfig::default().actuator.channels);
    let lines = Arc::new(MockOutputLines::new());
    let panel = ActuatorPanel::new(bindings, Arc::clone(&lines) as Arc<dyn OutputLines>);
    (panel, lines)
}

fn levels_of(writes: &[IndicatorWrite]) -> BTreeMap<Indicator, Level> {
    writes.iter().map(|w| (w.indicator, w.level)).collect()
}

#[test]
fn test_plan_per_state() {
    let all_bad = FeedbackDecision {
        bad_expression: true,
        bad_eye_contact: true,
        bad_gesture: true,
        disconnected_or_no_face: true,
    };

    let standby = levels_of(&plan(DeviceState::Standby, Some(&all_bad)));
    assert_eq!(standby[&Indicator::White], Level::High);
    for indicator in [Indicator::Red, Indicator::Yellow, Indicator::Green, Indicator::Blue] {
        assert_eq!(standby[&indicator], Level::Low);
    }

    let reporting = levels_of(&plan(DeviceState::Reporting, Some(&all_bad)));
    assert_eq!(reporting, standby);

    let disconnected = levels_of(&plan(DeviceState::Disconnected, Some(&all_bad)));
    assert!(disconnected.values().all(|level| *level == Level::Low));
    assert_eq!(disconnected.len(), 5);

    let recording = levels_of(&plan(DeviceState::Recording, Some(&all_bad)));
    assert_eq!(recording[&Indicator::White], Level::Low);
    assert_eq!(recording[&Indicator::Red], Level::High);
    for indicator in Indicator::FEEDBACK {
        assert_eq!(recording[&indicator], Level::High);
    }
}

#[test]
fn test_feedback_overlay_mapping() {
    let decision = FeedbackDecision {
        bad_expression: false,
        bad_eye_contact: true,
        bad_gesture: false,
        disconnected_or_no_face: true,
    };
    let levels = levels_of(&feedback_writes(&decision));
    assert_eq!(levels[&Indicator::Yellow], Level::High);
    assert_eq!(levels[&Indicator::Green], Level::Low);
    // No face alone lights the expression overlay
    assert_eq!(levels[&Indicator::Blue], Level::High);
}

#[test]
fn test_panel_drives_every_bound_line() {
    let (mut panel, lines) = create_test_panel();
    panel.show_state(DeviceState::Standby).unwrap();

    assert_eq!(lines.level(13), Some(Level::High));
    assert_eq!(lines.level(19), Some(Level::High));
    assert_eq!(lines.level(20), Some(Level::Low));
    for line in [149, 232, 15, 51, 77] {
        assert_eq!(lines.level(line), Some(Level::Low));
    }
    assert_eq!(panel.level(Indicator::White), Some(Level::High));
}

#[test]
fn test_disconnected_mapping_is_idempotent() {
    let (mut panel, lines) = create_test_panel();
    panel.show_state(DeviceState::Recording).unwrap();

    panel.show_state(DeviceState::Disconnected).unwrap();
    let once = (panel.levels(), lines.levels());
    panel.show_state(DeviceState::Disconnected).unwrap();
    let twice = (panel.levels(), lines.levels());

    assert_eq!(once, twice);
    assert!(once.1.values().all(|level| *level == Level::Low));
}

#[test]
fn test_steady_leaves_feedback_untouched() {
    let (mut panel, _lines) = create_test_panel();
    panel
        .show_feedback(&FeedbackDecision {
            bad_gesture: true,
            ..FeedbackDecision::default()
        })
        .unwrap();
    panel.show_steady(DeviceState::Recording).unwrap();

    assert_eq!(panel.level(Indicator::Green), Some(Level::High));
    assert_eq!(panel.level(Indicator::Red), Some(Level::High));
    assert_eq!(panel.level(Indicator::White), Some(Level::Low));
}

#[test]
fn test_write_failure_is_best_effort() {
    let (mut panel, lines) = create_test_panel();
    lines.fail_line(13);

    let result = panel.show_state(DeviceState::Standby);
    assert!(matches!(result, Err(ActuationError::Write { line: 13, .. })));

    // Other lines were still written
    assert_eq!(lines.level(19), Some(Level::High));
    assert_eq!(lines.level(51), Some(Level::Low));
}

#[test]
fn test_bindings_all_lines() {
    let bindings = ChannelBindings::from_config(&PodiumConfig::default().actuator.channels);
    assert_eq!(bindings.all_lines(), vec![13, 15, 19, 20, 51, 77, 149, 232]);
    assert_eq!(bindings.lines(Indicator::Blue), &[51, 77]);
}

#[test]
fn test_sysfs_lines() {
    let root = tempfile::tempdir().unwrap();
    // Pre-exported line
    std::fs::create_dir_all(root.path().join("gpio26")).unwrap();
    std::fs::write(root.path().join("gpio26").join("direction"), "in").unwrap();
    std::fs::write(root.path().join("gpio26").join("value"), "0").unwrap();

    let lines = SysfsOutputLines::new(root.path());
    lines.prepare(&[26]).unwrap();
    assert_eq!(
        std::fs::read_to_string(root.path().join("gpio26").join("direction")).unwrap(),
        "out"
    );

    lines.set(26, Level::High).unwrap();
    assert_eq!(
        std::fs::read_to_string(root.path().join("gpio26").join("value")).unwrap(),
        "1"
    );
    lines.set(26, Level::Low).unwrap();
    assert_eq!(
        std::fs::read_to_string(root.path().join("gpio26").join("value")).unwrap(),
        "0"
    );

    // Unexported line with no export file to write to
    assert!(matches!(
        lines.set(99, Level::High),
        Err(ActuationError::Write { line: 99, .. })
    ));
    assert!(matches!(
        lines.prepare(&[99]),
        Err(ActuationError::Export { line: 99, .. })
    ));
}

fn write_line_attr(root: &std::path::Path, line: u32, attr: &str, value: &str) {
    let dir = root.join(format!("gpio{}", line));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(attr), value).unwrap();
}

fn read_line_attr(root: &std::path::Path, line: u32, attr: &str) -> String {
    std::fs::read_to_string(root.join(format!("gpio{}", line)).join(attr)).unwrap()
}

#[test]
fn test_sysfs_prepare_continues_past_failed_line() {
    let root = tempfile::tempdir().unwrap();
    // Line 13 is not exported and there is no export file, so it fails
    write_line_attr(root.path(), 20, "direction", "in");
    write_line_attr(root.path(), 51, "direction", "in");

    let lines = SysfsOutputLines::new(root.path());
    let result = lines.prepare(&[13, 20, 51]);

    assert!(matches!(result, Err(ActuationError::Export { line: 13, .. })));
    assert_eq!(read_line_attr(root.path(), 20, "direction"), "out");
    assert_eq!(read_line_attr(root.path(), 51, "direction"), "out");
    assert!(lines.is_prepared(20));
    assert!(lines.is_prepared(51));
    assert!(!lines.is_prepared(13));
}

#[test]
fn test_sysfs_set_prepares_line_that_failed_earlier() {
    let root = tempfile::tempdir().unwrap();
    let lines = SysfsOutputLines::new(root.path());
    assert!(lines.prepare(&[20]).is_err());

    // The line shows up later, e.g. exported by another process
    write_line_attr(root.path(), 20, "direction", "in");
    write_line_attr(root.path(), 20, "value", "0");

    lines.set(20, Level::High).unwrap();
    assert!(lines.is_prepared(20));
    assert_eq!(read_line_attr(root.path(), 20, "direction"), "out");
    assert_eq!(read_line_attr(root.path(), 20, "value"), "1");
}
