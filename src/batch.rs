//! Batch field generation: cascade, grid fill, merge, and split.
//!
//! These build new fields from existing geometry. None of them touch the
//! document directly; the engine inserts the results and records a single
//! history entry per operation.
//!
//! Generated fields always get fresh ids and no data binding, so they have to
//! be mapped again before generation. Style is copied from the source field
//! where there is one.

#[cfg(test)]
#[path = "batch_test.rs"]
mod batch_test;

use crate::consts::{SPLIT_MARGIN_HORIZONTAL, SPLIT_MARGIN_VERTICAL};
use crate::doc::{Document, Field, FieldId, Orientation, Rect};
use crate::viewport::Viewport;

/// Fields stacked down the horizontal guides that start at or below the template's bottom edge.
///
/// Guides are sorted ascending and de-duplicated. Each guide except the last
/// starts a field; a field is as tall as the gap to the following guide,
/// except the final one, which keeps the template's height. Fewer than two
/// qualifying guides yields nothing.
#[must_use]
pub fn cascade_fields_to_guides(template: &Field, horizontal: &[f64]) -> Vec<Field> {
    let bottom = template.rect().bottom();
    let mut run: Vec<f64> = horizontal.iter().copied().filter(|&g| g >= bottom).collect();
    run.sort_by(f64::total_cmp);
    run.dedup();

    let starts = run.len().saturating_sub(1);
    (0..starts)
        .map(|i| {
            let y = run[i];
            let height = if i + 1 == starts { template.height } else { run[i + 1] - y };
            let rect = Rect::new(template.x, y, template.width, height);
            template.derive(rect, format!("{} {}", template.label, i + 2))
        })
        .collect()
}

/// Sorted, de-duplicated consecutive pairs.
fn bands(positions: &[f64]) -> Vec<(f64, f64)> {
    let mut sorted = positions.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Fields filling the grid formed by selected guides.
///
/// With two or more vertical positions, one field per cell, row-major. With
/// fewer, one full-page-width field per horizontal band. Fewer than two
/// horizontal positions yields nothing.
#[must_use]
pub fn fill_fields_from_guides(horizontal: &[f64], vertical: &[f64], page: u32, viewport: &Viewport) -> Vec<Field> {
    let rows = bands(horizontal);
    if rows.is_empty() {
        return Vec::new();
    }
    let columns = bands(vertical);

    let mut fields = Vec::new();
    for (r, (top, bottom)) in rows.iter().enumerate() {
        if columns.is_empty() {
            let rect = Rect::new(0.0, *top, viewport.page_width, bottom - top);
            fields.push(Field::new(page, rect, format!("Row {}", r + 1)));
            continue;
        }
        for (c, (left, right)) in columns.iter().enumerate() {
            let rect = Rect::new(*left, *top, right - left, bottom - top);
            fields.push(Field::new(page, rect, format!("Row {} Col {}", r + 1, c + 1)));
        }
    }
    fields
}

/// Bounding-box union of the given fields as one replacement field.
///
/// Only fields on the first existing field's page take part. Labels are
/// joined with spaces in `ids` order and style comes from the first field.
/// Returns the merged field and the ids it replaces, or `None` when fewer
/// than two fields qualify.
#[must_use]
pub fn merge_fields(doc: &Document, ids: &[FieldId]) -> Option<(Field, Vec<FieldId>)> {
    let found: Vec<&Field> = ids.iter().filter_map(|id| doc.field(id)).collect();
    let first = *found.first()?;
    let members: Vec<&Field> = found.into_iter().filter(|f| f.page == first.page).collect();
    if members.len() < 2 {
        return None;
    }

    let bounds = members.iter().skip(1).fold(first.rect(), |acc, f| acc.union(&f.rect()));
    let label = members.iter().map(|f| f.label.as_str()).collect::<Vec<_>>().join(" ");
    let merged = first.derive(bounds, label);
    Some((merged, members.iter().map(|f| f.id).collect()))
}

/// Clamp a split position so both halves keep a minimum extent.
///
/// Vertical cuts (an x position) stay [`SPLIT_MARGIN_VERTICAL`] inside the
/// field; horizontal cuts stay [`SPLIT_MARGIN_HORIZONTAL`] inside. A field
/// too small for both margins is cut at its midpoint.
#[must_use]
pub fn clamp_split_position(rect: &Rect, orientation: Orientation, position: f64) -> f64 {
    let (start, extent, margin) = match orientation {
        Orientation::Vertical => (rect.x, rect.width, SPLIT_MARGIN_VERTICAL),
        Orientation::Horizontal => (rect.y, rect.height, SPLIT_MARGIN_HORIZONTAL),
    };
    let lo = start + margin;
    let hi = start + extent - margin;
    if lo > hi {
        return start + extent / 2.0;
    }
    position.clamp(lo, hi)
}

/// Cut a field in two at `position` (page units along the cut's axis).
///
/// A vertical cut yields left/right halves; a horizontal cut yields top/bottom
/// halves. Labels get `" 1"` and `" 2"` suffixes. The position is clamped
/// first.
#[must_use]
pub fn split_field(field: &Field, orientation: Orientation, position: f64) -> (Field, Field) {
    let rect = field.rect();
    let at = clamp_split_position(&rect, orientation, position);
    let (a, b) = match orientation {
        Orientation::Vertical => {
            let left = at - rect.x;
            (Rect::new(rect.x, rect.y, left, rect.height), Rect::new(at, rect.y, rect.width - left, rect.height))
        }
        Orientation::Horizontal => {
            let top = at - rect.y;
            (Rect::new(rect.x, rect.y, rect.width, top), Rect::new(rect.x, at, rect.width, rect.height - top))
        }
    };
    (field.derive(a, format!("{} 1", field.label)), field.derive(b, format!("{} 2", field.label)))
}
