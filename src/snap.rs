//! Snap resolution against guides and sibling field edges.
//!
//! Two tie-break policies live here and both are load-bearing:
//!
//! - [`snap_to_guides`] returns the **first** guide in list order that lies
//!   within tolerance, even if a later guide is closer.
//! - [`snap_to_fields`] lets the **last** qualifying sibling edge (or
//!   horizontal guide) win, each axis resolved independently.
//!
//! All distances are page units; the caller derives the tolerance from the
//! screen-pixel threshold and the current scale.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::doc::{Document, FieldId, Orientation, Rect};

/// Result of snapping a single coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub value: f64,
    pub snapped: bool,
}

/// A line to draw while a snap is active, for UI feedback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapLine {
    pub orientation: Orientation,
    pub position: f64,
}

impl SnapLine {
    #[must_use]
    pub fn vertical(x: f64) -> Self {
        Self { orientation: Orientation::Vertical, position: x }
    }

    #[must_use]
    pub fn horizontal(y: f64) -> Self {
        Self { orientation: Orientation::Horizontal, position: y }
    }
}

/// Corrected top-left position plus the lines that caused the correction.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSnap {
    pub x: f64,
    pub y: f64,
    pub lines: Vec<SnapLine>,
}

/// Which edges of a rectangle are moving during a resize.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

fn within(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Snap `value` to the first guide within `tolerance`.
#[must_use]
pub fn snap_to_guides(value: f64, guides: &[f64], tolerance: f64) -> SnapResult {
    guides
        .iter()
        .find(|&&g| within(value, g, tolerance))
        .map_or(SnapResult { value, snapped: false }, |&g| SnapResult { value: g, snapped: true })
}

/// Align a moving rectangle's edges to siblings on the same page and to horizontal guides.
///
/// Checks left-to-left, right-to-right, top-to-top and bottom-to-bottom against
/// every sibling (the moving field itself is skipped), then top and bottom
/// against each horizontal guide. Every comparison uses the unsnapped `rect`;
/// a later match overwrites an earlier one on the same axis.
#[must_use]
pub fn snap_to_fields(
    doc: &Document,
    moving: &FieldId,
    page: u32,
    rect: Rect,
    horizontal_guides: &[f64],
    tolerance: f64,
) -> FieldSnap {
    let mut x = rect.x;
    let mut y = rect.y;
    let mut lines = Vec::new();

    for other in doc.on_page(page).filter(|f| f.id != *moving) {
        let o = other.rect();
        if within(rect.x, o.x, tolerance) {
            x = o.x;
            lines.push(SnapLine::vertical(o.x));
        }
        if within(rect.right(), o.right(), tolerance) {
            x = o.right() - rect.width;
            lines.push(SnapLine::vertical(o.right()));
        }
        if within(rect.y, o.y, tolerance) {
            y = o.y;
            lines.push(SnapLine::horizontal(o.y));
        }
        if within(rect.bottom(), o.bottom(), tolerance) {
            y = o.bottom() - rect.height;
            lines.push(SnapLine::horizontal(o.bottom()));
        }
    }

    for &g in horizontal_guides {
        if within(rect.y, g, tolerance) {
            y = g;
            lines.push(SnapLine::horizontal(g));
        }
        if within(rect.bottom(), g, tolerance) {
            y = g - rect.height;
            lines.push(SnapLine::horizontal(g));
        }
    }

    FieldSnap { x, y, lines }
}

/// Snap a single moving edge: first-match guide snap, then last-match sibling snap.
fn snap_edge(
    value: f64,
    guides: &[f64],
    siblings: &[Rect],
    sibling_edge: fn(&Rect) -> f64,
    tolerance: f64,
) -> Option<f64> {
    let guide = snap_to_guides(value, guides, tolerance);
    let mut result = guide.snapped.then_some(guide.value);
    for sibling in siblings {
        let edge = sibling_edge(sibling);
        if within(value, edge, tolerance) {
            result = Some(edge);
        }
    }
    result
}

/// Snap the moving edges of a rectangle being resized.
///
/// Left/right edges snap to vertical guides and to sibling left/right edges;
/// top/bottom edges snap to horizontal guides and to sibling top/bottom edges.
/// Fixed edges never move.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn snap_resize_edges(
    doc: &Document,
    moving: &FieldId,
    page: u32,
    rect: Rect,
    edges: Edges,
    vertical_guides: &[f64],
    horizontal_guides: &[f64],
    tolerance: f64,
) -> (Rect, Vec<SnapLine>) {
    let siblings: Vec<Rect> = doc.on_page(page).filter(|f| f.id != *moving).map(|f| f.rect()).collect();
    let mut left = rect.x;
    let mut right = rect.right();
    let mut top = rect.y;
    let mut bottom = rect.bottom();
    let mut lines = Vec::new();

    if edges.left {
        if let Some(v) = snap_edge(left, vertical_guides, &siblings, |r| r.x, tolerance) {
            left = v;
            lines.push(SnapLine::vertical(v));
        }
    }
    if edges.right {
        if let Some(v) = snap_edge(right, vertical_guides, &siblings, Rect::right, tolerance) {
            right = v;
            lines.push(SnapLine::vertical(v));
        }
    }
    if edges.top {
        if let Some(v) = snap_edge(top, horizontal_guides, &siblings, |r| r.y, tolerance) {
            top = v;
            lines.push(SnapLine::horizontal(v));
        }
    }
    if edges.bottom {
        if let Some(v) = snap_edge(bottom, horizontal_guides, &siblings, Rect::bottom, tolerance) {
            bottom = v;
            lines.push(SnapLine::horizontal(v));
        }
    }

    (Rect::new(left, top, right - left, bottom - top), lines)
}
