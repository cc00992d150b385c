//! Geometry deltas for drags, corner resizes, and keyboard nudges.
//!
//! Pure functions: the engine supplies the anchor geometry captured at
//! drag-start (or at the last precision-mode toggle) plus the current pointer,
//! and gets back the in-progress geometry. Nothing here snaps; snapping is
//! layered on top by the engine when precision mode is off.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    MIN_FIELD_HEIGHT, MIN_FIELD_WIDTH, NUDGE_ACCEL_MS, NUDGE_BASE_STEP, NUDGE_MAX_CATCHUP_STEPS, NUDGE_MAX_MULTIPLIER,
    NUDGE_REPEAT_MS,
    PRECISION_FACTOR,
};
use crate::doc::Rect;
use crate::input::{AxisLock, Corner};
use crate::snap::Edges;
use crate::viewport::{ScreenPoint, Viewport};

/// Page-unit delta between the anchor pointer and the current pointer.
///
/// Precision mode scales the delta by [`PRECISION_FACTOR`]; an axis lock
/// zeroes the other component.
#[must_use]
pub fn drag_delta(
    anchor: ScreenPoint,
    pointer: ScreenPoint,
    viewport: &Viewport,
    precision: bool,
    lock: AxisLock,
) -> (f64, f64) {
    let factor = if precision { PRECISION_FACTOR } else { 1.0 };
    let dx = viewport.screen_len_to_page(pointer.x - anchor.x) * factor;
    let dy = viewport.screen_len_to_page(pointer.y - anchor.y) * factor;
    match lock {
        AxisLock::None => (dx, dy),
        AxisLock::X => (dx, 0.0),
        AxisLock::Y => (0.0, dy),
    }
}

#[must_use]
pub fn translate(rect: Rect, dx: f64, dy: f64) -> Rect {
    Rect { x: rect.x + dx, y: rect.y + dy, ..rect }
}

/// Edges that move when dragging a given corner.
#[must_use]
pub fn corner_edges(corner: Corner) -> Edges {
    match corner {
        Corner::Nw => Edges { left: true, top: true, ..Edges::default() },
        Corner::Ne => Edges { right: true, top: true, ..Edges::default() },
        Corner::Sw => Edges { left: true, bottom: true, ..Edges::default() },
        Corner::Se => Edges { right: true, bottom: true, ..Edges::default() },
    }
}

/// Apply a corner drag delta to the original rectangle, without clamping.
#[must_use]
pub fn resize_from_corner(orig: Rect, corner: Corner, dx: f64, dy: f64) -> Rect {
    let edges = corner_edges(corner);
    let mut left = orig.x;
    let mut right = orig.right();
    let mut top = orig.y;
    let mut bottom = orig.bottom();
    if edges.left {
        left += dx;
    }
    if edges.right {
        right += dx;
    }
    if edges.top {
        top += dy;
    }
    if edges.bottom {
        bottom += dy;
    }
    Rect::new(left, top, right - left, bottom - top)
}

/// Enforce the minimum field size, keeping the fixed edges where they are.
#[must_use]
pub fn clamp_resize(rect: Rect, corner: Corner) -> Rect {
    let edges = corner_edges(corner);
    let mut out = rect;
    if out.width < MIN_FIELD_WIDTH {
        if edges.left {
            out.x = rect.right() - MIN_FIELD_WIDTH;
        }
        out.width = MIN_FIELD_WIDTH;
    }
    if out.height < MIN_FIELD_HEIGHT {
        if edges.top {
            out.y = rect.bottom() - MIN_FIELD_HEIGHT;
        }
        out.height = MIN_FIELD_HEIGHT;
    }
    out
}

// ── Keyboard nudges ─────────────────────────────────────────────

/// Direction of an arrow-key nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NudgeDirection {
    /// Unit vector in page space (y grows downward).
    #[must_use]
    pub fn unit(self) -> (f64, f64) {
        match self {
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
        }
    }
}

/// Step multiplier after the key has been held for `held_ms`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn nudge_multiplier(held_ms: u64) -> f64 {
    (1.0 + (held_ms / NUDGE_ACCEL_MS) as f64).min(NUDGE_MAX_MULTIPLIER)
}

/// Page-unit nudge distance for one repeat tick.
#[must_use]
pub fn nudge_step(held_ms: u64, precision: bool) -> f64 {
    let factor = if precision { PRECISION_FACTOR } else { 1.0 };
    NUDGE_BASE_STEP * nudge_multiplier(held_ms) * factor
}

/// An arrow key being held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nudge {
    pub direction: NudgeDirection,
    /// Timestamp of the initial key-down.
    pub started_ms: u64,
    /// Timestamp of the most recent applied step.
    pub last_step_ms: u64,
}

impl Nudge {
    #[must_use]
    pub fn new(direction: NudgeDirection, now_ms: u64) -> Self {
        Self { direction, started_ms: now_ms, last_step_ms: now_ms }
    }

    /// Repeat steps that are due by `now_ms`, as page-unit distances.
    ///
    /// Advances `last_step_ms` by one repeat interval per returned step, so a
    /// slightly late frame catches up. At most [`NUDGE_MAX_CATCHUP_STEPS`] are
    /// returned; anything further behind is dropped and the cadence restarts
    /// from `now_ms`.
    pub fn due_steps(&mut self, now_ms: u64, precision: bool) -> Vec<f64> {
        let mut steps = Vec::new();
        while now_ms.saturating_sub(self.last_step_ms) >= NUDGE_REPEAT_MS {
            if steps.len() == NUDGE_MAX_CATCHUP_STEPS {
                self.last_step_ms = now_ms;
                break;
            }
            self.last_step_ms += NUDGE_REPEAT_MS;
            steps.push(nudge_step(self.last_step_ms - self.started_ms, precision));
        }
        steps
    }
}
