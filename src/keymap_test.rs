use super::*;

fn mods(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers { shift, ctrl, alt, meta }
}

// =============================================================
// KeyCombo parsing
// =============================================================

#[test]
fn parse_plain_key() {
    let c: KeyCombo = "Delete".parse().unwrap();
    assert_eq!(c.key, "delete");
    assert_eq!(c.modifiers, Modifiers::default());
}

#[test]
fn parse_modifiers_any_order_and_case() {
    let c: KeyCombo = "Shift+CTRL+z".parse().unwrap();
    assert_eq!(c.key, "z");
    assert_eq!(c.modifiers, mods(true, true, false, false));
}

#[test]
fn parse_modifier_aliases() {
    let c: KeyCombo = "option+cmd+k".parse().unwrap();
    assert_eq!(c.modifiers, mods(false, false, true, true));
}

#[test]
fn parse_key_aliases() {
    assert_eq!("esc".parse::<KeyCombo>().unwrap().key, "escape");
    assert_eq!("alt+left".parse::<KeyCombo>().unwrap().key, "arrowleft");
}

#[test]
fn parse_rejects_empty() {
    assert_eq!("  ".parse::<KeyCombo>(), Err(KeymapError::Empty));
}

#[test]
fn parse_rejects_modifier_only() {
    assert!(matches!("ctrl+shift".parse::<KeyCombo>(), Err(KeymapError::InvalidCombo(_))));
}

#[test]
fn parse_rejects_two_keys() {
    assert!(matches!("a+b".parse::<KeyCombo>(), Err(KeymapError::MultipleKeys(_))));
}

#[test]
fn parse_rejects_dangling_plus() {
    assert!(matches!("ctrl+".parse::<KeyCombo>(), Err(KeymapError::InvalidCombo(_))));
}

#[test]
fn combo_display_round_trips() {
    let c: KeyCombo = "alt+ctrl+x".parse().unwrap();
    assert_eq!(c.to_string(), "ctrl+alt+x");
    assert_eq!(c.to_string().parse::<KeyCombo>().unwrap(), c);
}

#[test]
fn combo_requires_exact_modifiers() {
    let c: KeyCombo = "ctrl+z".parse().unwrap();
    assert!(c.matches(&Key::new("Z"), mods(true, false, false, false)));
    assert!(!c.matches(&Key::new("z"), mods(true, true, false, false)));
    assert!(!c.matches(&Key::new("z"), Modifiers::default()));
}

// =============================================================
// EditorAction
// =============================================================

#[test]
fn action_names_round_trip() {
    for action in EditorAction::ALL {
        assert_eq!(action.name().parse::<EditorAction>().unwrap(), action);
    }
}

#[test]
fn action_unknown_name() {
    assert_eq!("teleport".parse::<EditorAction>(), Err(KeymapError::UnknownAction("teleport".into())));
}

// =============================================================
// ShortcutMap
// =============================================================

#[test]
fn defaults_bind_every_action() {
    let map = ShortcutMap::default();
    for action in EditorAction::ALL {
        assert!(map.combo(action).is_some(), "{} unbound", action.name());
    }
}

#[test]
fn defaults_distinguish_undo_and_redo() {
    let map = ShortcutMap::default();
    assert_eq!(map.resolve(&Key::new("z"), mods(true, false, false, false)), Some(EditorAction::Undo));
    assert_eq!(map.resolve(&Key::new("z"), mods(true, true, false, false)), Some(EditorAction::Redo));
}

#[test]
fn overrides_replace_defaults() {
    let overrides = HashMap::from([("undo".to_string(), "meta+u".to_string())]);
    let map = ShortcutMap::from_overrides(&overrides).unwrap();
    assert_eq!(map.resolve(&Key::new("u"), mods(false, false, false, true)), Some(EditorAction::Undo));
    assert_eq!(map.resolve(&Key::new("z"), mods(true, false, false, false)), None);
    // Untouched actions keep their defaults.
    assert_eq!(map.resolve(&Key::new("Escape"), Modifiers::default()), Some(EditorAction::Cancel));
}

#[test]
fn overrides_reject_unknown_action() {
    let overrides = HashMap::from([("fly".to_string(), "f".to_string())]);
    assert!(matches!(ShortcutMap::from_overrides(&overrides), Err(KeymapError::UnknownAction(_))));
}

#[test]
fn overrides_reject_bad_combo() {
    let overrides = HashMap::from([("undo".to_string(), "ctrl+".to_string())]);
    assert!(ShortcutMap::from_overrides(&overrides).is_err());
}

#[test]
fn release_matches_key_regardless_of_modifiers() {
    let map = ShortcutMap::default();
    assert!(map.is_release_of(&Key::new("x"), EditorAction::LockAxisX));
    assert!(map.is_release_of(&Key::new("CapsLock"), EditorAction::PrecisionMode));
    assert!(!map.is_release_of(&Key::new("y"), EditorAction::LockAxisX));
}

#[test]
fn unbound_key_resolves_to_none() {
    let map = ShortcutMap::default();
    assert_eq!(map.resolve(&Key::new("q"), Modifiers::default()), None);
}
