use uuid::Uuid;

use super::*;

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
}

#[test]
fn modifiers_deserialize_missing_as_false() {
    let m: Modifiers = serde_json::from_str(r#"{"shift": true}"#).unwrap();
    assert_eq!(m, Modifiers { shift: true, ..Default::default() });
}

// =============================================================
// Button / Key
// =============================================================

#[test]
fn button_default_is_primary() {
    assert_eq!(Button::default(), Button::Primary);
}

#[test]
fn key_normalized_lowercases() {
    assert_eq!(Key::new("ArrowLeft").normalized(), "arrowleft");
    assert_eq!(Key::new("Z").normalized(), "z");
}

// =============================================================
// InputState
// =============================================================

#[test]
fn input_state_default_is_idle() {
    assert!(InputState::default().is_idle());
    assert_eq!(InputState::default().name(), "idle");
}

#[test]
fn input_state_names() {
    let id = Uuid::new_v4();
    let splitting = InputState::Splitting { id, orientation: Orientation::Vertical, position: None };
    assert_eq!(splitting.name(), "splitting");
    assert!(!splitting.is_idle());
    let boxing = InputState::BoxSelecting { origin: ScreenPoint::new(0.0, 0.0), current: ScreenPoint::new(1.0, 1.0) };
    assert_eq!(boxing.name(), "box_selecting");
}

#[test]
fn axis_lock_default_is_none() {
    assert_eq!(AxisLock::default(), AxisLock::None);
}

#[test]
fn corner_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Corner::Nw).unwrap(), "\"nw\"");
    let c: Corner = serde_json::from_str("\"se\"").unwrap();
    assert_eq!(c, Corner::Se);
}
