//! Editor configuration: JSON file plus environment overrides.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::consts::{DEFAULT_GUIDE_OFFSET, HISTORY_LIMIT, SNAP_THRESHOLD_PX};
use crate::keymap::{KeymapError, ShortcutMap};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid shortcut: {0}")]
    Keymap(#[from] KeymapError),
    #[error("invalid {name}: {value}")]
    OutOfRange { name: &'static str, value: String },
}

/// Construction-time settings for an editing session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Initial viewport scale (screen pixels per page unit).
    pub scale: f64,
    /// Initial 1-based page.
    pub page: u32,
    /// Snap distance in screen pixels.
    pub snap_threshold_px: f64,
    /// Maximum retained history snapshots.
    pub history_limit: usize,
    /// Where `add_guide` places a new guide.
    pub default_guide_offset: f64,
    /// `action name -> key combo` overrides.
    pub shortcuts: HashMap<String, String>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            page: 1,
            snap_threshold_px: SNAP_THRESHOLD_PX,
            history_limit: HISTORY_LIMIT,
            default_guide_offset: DEFAULT_GUIDE_OFFSET,
            shortcuts: HashMap::new(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config document. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed JSON or out-of-range values.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file can't be read, otherwise as
    /// [`EditorConfig::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Apply overrides from the process environment.
    ///
    /// - `PAGEFIELDS_SCALE`
    /// - `PAGEFIELDS_SNAP_THRESHOLD_PX`
    /// - `PAGEFIELDS_HISTORY_LIMIT`
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable or out-of-range values are ignored.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.scale = lookup_parse(&lookup, "PAGEFIELDS_SCALE")
            .filter(|v: &f64| v.is_finite() && *v > 0.0)
            .unwrap_or(self.scale);
        self.snap_threshold_px = lookup_parse(&lookup, "PAGEFIELDS_SNAP_THRESHOLD_PX")
            .filter(|v: &f64| v.is_finite() && *v >= 0.0)
            .unwrap_or(self.snap_threshold_px);
        self.history_limit = lookup_parse(&lookup, "PAGEFIELDS_HISTORY_LIMIT")
            .filter(|v: &usize| *v > 0)
            .unwrap_or(self.history_limit);
        self
    }

    /// Resolve the shortcut overrides against the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`KeymapError`] for unknown actions or malformed combos.
    pub fn shortcut_map(&self) -> Result<ShortcutMap, KeymapError> {
        ShortcutMap::from_overrides(&self.shortcuts)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::OutOfRange { name: "scale", value: self.scale.to_string() });
        }
        if !self.snap_threshold_px.is_finite() || self.snap_threshold_px < 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "snap_threshold_px",
                value: self.snap_threshold_px.to_string(),
            });
        }
        if self.history_limit == 0 {
            return Err(ConfigError::OutOfRange { name: "history_limit", value: "0".into() });
        }
        self.shortcut_map()?;
        Ok(())
    }
}

fn lookup_parse<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => None,
    }
}
