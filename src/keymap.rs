//! Customizable keyboard shortcuts.
//!
//! The host hands the engine an `action name -> key combo` map (e.g.
//! `"undo" -> "ctrl+z"`). Entries override the built-in defaults; the engine
//! never reads shortcut storage itself.

#[cfg(test)]
#[path = "keymap_test.rs"]
mod keymap_test;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::input::{Key, Modifiers};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeymapError {
    #[error("empty key combo")]
    Empty,
    #[error("invalid key combo '{0}'")]
    InvalidCombo(String),
    #[error("multiple keys in combo '{0}'")]
    MultipleKeys(String),
    #[error("unknown editor action '{0}'")]
    UnknownAction(String),
}

/// Keyboard-triggered editor actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorAction {
    Undo,
    Redo,
    Delete,
    /// Leaves split mode; clears the selection when idle.
    Cancel,
    /// Held to scale movement down.
    PrecisionMode,
    LockAxisX,
    LockAxisY,
    NudgeLeft,
    NudgeRight,
    NudgeUp,
    NudgeDown,
    ToggleMode,
    SelectAll,
    MergeFields,
    SplitVertical,
    SplitHorizontal,
}

impl EditorAction {
    pub const ALL: [EditorAction; 16] = [
        Self::Undo,
        Self::Redo,
        Self::Delete,
        Self::Cancel,
        Self::PrecisionMode,
        Self::LockAxisX,
        Self::LockAxisY,
        Self::NudgeLeft,
        Self::NudgeRight,
        Self::NudgeUp,
        Self::NudgeDown,
        Self::ToggleMode,
        Self::SelectAll,
        Self::MergeFields,
        Self::SplitVertical,
        Self::SplitHorizontal,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Delete => "delete",
            Self::Cancel => "cancel",
            Self::PrecisionMode => "precision_mode",
            Self::LockAxisX => "lock_axis_x",
            Self::LockAxisY => "lock_axis_y",
            Self::NudgeLeft => "nudge_left",
            Self::NudgeRight => "nudge_right",
            Self::NudgeUp => "nudge_up",
            Self::NudgeDown => "nudge_down",
            Self::ToggleMode => "toggle_mode",
            Self::SelectAll => "select_all",
            Self::MergeFields => "merge_fields",
            Self::SplitVertical => "split_vertical",
            Self::SplitHorizontal => "split_horizontal",
        }
    }

    fn default_combo(self) -> &'static str {
        match self {
            Self::Undo => "ctrl+z",
            Self::Redo => "ctrl+shift+z",
            Self::Delete => "delete",
            Self::Cancel => "escape",
            Self::PrecisionMode => "capslock",
            Self::LockAxisX => "alt+x",
            Self::LockAxisY => "alt+y",
            Self::NudgeLeft => "arrowleft",
            Self::NudgeRight => "arrowright",
            Self::NudgeUp => "arrowup",
            Self::NudgeDown => "arrowdown",
            Self::ToggleMode => "g",
            Self::SelectAll => "ctrl+a",
            Self::MergeFields => "ctrl+m",
            Self::SplitVertical => "ctrl+shift+v",
            Self::SplitHorizontal => "ctrl+shift+h",
        }
    }
}

impl FromStr for EditorAction {
    type Err = KeymapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| KeymapError::UnknownAction(s.to_string()))
    }
}

/// A key plus the exact set of modifiers that must accompany it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    /// Lowercased key name.
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    /// Whether a key event triggers this combo. Modifiers must match exactly.
    #[must_use]
    pub fn matches(&self, key: &Key, modifiers: Modifiers) -> bool {
        self.key == key.normalized() && self.modifiers == modifiers
    }
}

impl FromStr for KeyCombo {
    type Err = KeymapError;

    /// Parse a combo like `"ctrl+shift+z"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(KeymapError::Empty);
        }

        let mut modifiers = Modifiers::default();
        let mut key = None;
        for part in trimmed.split('+') {
            let part = part.trim().to_lowercase();
            match part.as_str() {
                "" => return Err(KeymapError::InvalidCombo(s.to_string())),
                "ctrl" | "control" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                "alt" | "option" | "opt" => modifiers.alt = true,
                "meta" | "cmd" | "super" | "win" => modifiers.meta = true,
                _ => {
                    if key.is_some() {
                        return Err(KeymapError::MultipleKeys(s.to_string()));
                    }
                    key = Some(normalize_key_name(&part));
                }
            }
        }

        let key = key.ok_or_else(|| KeymapError::InvalidCombo(s.to_string()))?;
        Ok(Self { key, modifiers })
    }
}

/// Accept a few common aliases for named keys.
fn normalize_key_name(name: &str) -> String {
    match name {
        "esc" => "escape".into(),
        "del" => "delete".into(),
        "left" => "arrowleft".into(),
        "right" => "arrowright".into(),
        "up" => "arrowup".into(),
        "down" => "arrowdown".into(),
        "space" => " ".into(),
        other => other.into(),
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (held, name) in [(m.ctrl, "ctrl"), (m.shift, "shift"), (m.alt, "alt"), (m.meta, "meta")] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        write!(f, "{}", self.key)
    }
}

/// Resolved shortcut table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutMap {
    bindings: BTreeMap<EditorAction, KeyCombo>,
}

impl Default for ShortcutMap {
    fn default() -> Self {
        let bindings = EditorAction::ALL
            .into_iter()
            .filter_map(|action| match action.default_combo().parse() {
                Ok(combo) => Some((action, combo)),
                Err(_) => None,
            })
            .collect();
        Self { bindings }
    }
}

impl ShortcutMap {
    /// Build a map from `action -> combo` overrides layered over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`KeymapError`] for an unknown action name or an unparseable combo.
    pub fn from_overrides(overrides: &HashMap<String, String>) -> Result<Self, KeymapError> {
        let mut map = Self::default();
        for (action, combo) in overrides {
            let action: EditorAction = action.parse()?;
            let combo: KeyCombo = combo.parse()?;
            map.bindings.insert(action, combo);
        }
        Ok(map)
    }

    #[must_use]
    pub fn combo(&self, action: EditorAction) -> Option<&KeyCombo> {
        self.bindings.get(&action)
    }

    /// The action bound to a key event, if any. Ties resolve to the first action in [`EditorAction::ALL`] order.
    #[must_use]
    pub fn resolve(&self, key: &Key, modifiers: Modifiers) -> Option<EditorAction> {
        self.bindings
            .iter()
            .find(|(_, combo)| combo.matches(key, modifiers))
            .map(|(action, _)| *action)
    }

    /// Whether a released key is the key bound to `action`.
    ///
    /// Modifiers often change before the key itself comes up, so key-up
    /// matching looks at the key name alone.
    #[must_use]
    pub fn is_release_of(&self, key: &Key, action: EditorAction) -> bool {
        self.bindings.get(&action).is_some_and(|combo| combo.key == key.normalized())
    }

    /// All bindings in action order.
    pub fn iter(&self) -> impl Iterator<Item = (EditorAction, &KeyCombo)> {
        self.bindings.iter().map(|(a, c)| (*a, c))
    }
}
