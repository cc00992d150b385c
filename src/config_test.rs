#![allow(clippy::float_cmp)]

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let owned: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| owned.get(key).cloned()
}

#[test]
fn defaults_match_engine_constants() {
    let cfg = EditorConfig::default();
    assert_eq!(cfg.scale, 1.0);
    assert_eq!(cfg.page, 1);
    assert_eq!(cfg.snap_threshold_px, 5.0);
    assert_eq!(cfg.history_limit, 50);
    assert_eq!(cfg.default_guide_offset, 100.0);
    assert!(cfg.shortcuts.is_empty());
}

#[test]
fn from_json_fills_missing_keys() {
    let cfg = EditorConfig::from_json_str(r#"{ "scale": 1.5 }"#).unwrap();
    assert_eq!(cfg.scale, 1.5);
    assert_eq!(cfg.history_limit, 50);
}

#[test]
fn from_json_reads_shortcuts() {
    let cfg = EditorConfig::from_json_str(r#"{ "shortcuts": { "undo": "meta+z" } }"#).unwrap();
    let map = cfg.shortcut_map().unwrap();
    assert_eq!(map.combo(crate::keymap::EditorAction::Undo).unwrap().to_string(), "meta+z");
}

#[test]
fn from_json_rejects_bad_shortcut() {
    let err = EditorConfig::from_json_str(r#"{ "shortcuts": { "undo": "ctrl+" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Keymap(_)));
}

#[test]
fn from_json_rejects_zero_scale() {
    let err = EditorConfig::from_json_str(r#"{ "scale": 0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { name: "scale", .. }));
}

#[test]
fn from_json_rejects_zero_history() {
    let err = EditorConfig::from_json_str(r#"{ "history_limit": 0 }"#).unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { name: "history_limit", .. }));
}

#[test]
fn from_json_rejects_malformed() {
    assert!(matches!(EditorConfig::from_json_str("{"), Err(ConfigError::Json(_))));
}

#[test]
fn load_missing_file_is_io_error() {
    let err = EditorConfig::load(Path::new("/nonexistent/pagefields.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn overrides_apply_valid_values() {
    let cfg = EditorConfig::default().with_overrides(lookup_from(&[
        ("PAGEFIELDS_SCALE", "2.5"),
        ("PAGEFIELDS_SNAP_THRESHOLD_PX", "8"),
        ("PAGEFIELDS_HISTORY_LIMIT", "10"),
    ]));
    assert_eq!(cfg.scale, 2.5);
    assert_eq!(cfg.snap_threshold_px, 8.0);
    assert_eq!(cfg.history_limit, 10);
}

#[test]
fn overrides_ignore_invalid_values() {
    let cfg = EditorConfig::default().with_overrides(lookup_from(&[
        ("PAGEFIELDS_SCALE", "-1"),
        ("PAGEFIELDS_SNAP_THRESHOLD_PX", "lots"),
        ("PAGEFIELDS_HISTORY_LIMIT", "0"),
    ]));
    assert_eq!(cfg, EditorConfig::default());
}
