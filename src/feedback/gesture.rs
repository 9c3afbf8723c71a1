/// Labels the gesture service can return
pub const GESTURE_VOCABULARY: [&str; 18] = [
    "call_me",
    "clasp_hands",
    "cross_arms",
    "hide_one_arm",
    "hide_two_arms",
    "hold",
    "list",
    "move",
    "open_one_arm",
    "open_two_arms",
    "point",
    "roll",
    "rotate_head",
    "show_level",
    "show_small_thing",
    "stand_improperly",
    "stand_properly",
    "touch_body",
];

pub fn is_known_gesture(label: &str) -> bool {
    GESTURE_VOCABULARY.contains(&label)
}
