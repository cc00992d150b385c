//! Input model: modifier keys, buttons, keys, and the gesture state machine.
//!
//! `Modifiers`, `Button` and `Key` describe a raw event. `InputState` is the
//! active gesture tracked between pointer-down and pointer-up (or Escape, for
//! splitting), carrying everything needed to recompute in-progress geometry
//! from the pointer and to commit it on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::doc::{FieldId, GuideRef, Orientation, Rect};
use crate::viewport::ScreenPoint;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"ArrowLeft"`, `"z"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Lowercased key name used for shortcut matching.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }
}

/// Resize handle at one corner of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Nw,
    Ne,
    Sw,
    Se,
}

/// Axis a drag is locked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisLock {
    #[default]
    None,
    /// Only horizontal movement is applied.
    X,
    /// Only vertical movement is applied.
    Y,
}

/// Pointer position and the geometry it was captured against.
///
/// In-progress geometry is always `origin + (pointer - anchor.pointer) * factor`;
/// toggling precision mode re-captures the anchor so nothing jumps.
#[derive(Debug, Clone, PartialEq)]
pub struct DragAnchor {
    /// Screen-space pointer position when the anchor was captured.
    pub pointer: ScreenPoint,
    /// Field geometry at capture time, one entry per affected field.
    pub rects: Vec<(FieldId, Rect)>,
    /// Guide positions at capture time, one entry per affected guide.
    pub guides: Vec<(GuideRef, f64)>,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// One or more selected fields are being moved.
    DraggingFields {
        /// The field under the pointer at press time.
        id: FieldId,
        /// Whether the whole selection moves rigidly (no snapping).
        multi: bool,
        /// Screen position of the press, for click-vs-drag disambiguation.
        press: ScreenPoint,
        /// A release without movement narrows the selection to `id`.
        click_selects: bool,
        anchor: DragAnchor,
    },
    /// A field is being resized from one corner.
    Resizing { id: FieldId, corner: Corner, anchor: DragAnchor },
    /// One or more selected guides are being moved along their axes.
    DraggingGuides {
        /// The guide under the pointer at press time.
        guide: GuideRef,
        multi: bool,
        press: ScreenPoint,
        click_selects: bool,
        anchor: DragAnchor,
    },
    /// A selection rectangle is being dragged out on empty canvas.
    BoxSelecting {
        /// Screen position where the box started.
        origin: ScreenPoint,
        /// Latest screen position of the opposite corner.
        current: ScreenPoint,
    },
    /// A cut line is tracking the pointer over a single field.
    Splitting {
        id: FieldId,
        orientation: Orientation,
        /// Clamped, snapped cut position in page units; `None` until the pointer moves.
        position: Option<f64>,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DraggingFields { .. } => "dragging_fields",
            Self::Resizing { .. } => "resizing",
            Self::DraggingGuides { .. } => "dragging_guides",
            Self::BoxSelecting { .. } => "box_selecting",
            Self::Splitting { .. } => "splitting",
        }
    }
}
