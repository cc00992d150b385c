//! Guide manager: add, delete, move, and cascade alignment guides.

#[cfg(test)]
#[path = "guides_test.rs"]
mod guides_test;

use crate::doc::{GuideRef, Guides, Orientation};
use crate::viewport::Viewport;

/// Clamp a guide position to the page extent for its orientation.
#[must_use]
pub fn clamp_guide(position: f64, orientation: Orientation, viewport: &Viewport) -> f64 {
    match orientation {
        Orientation::Vertical => viewport.clamp_x(position),
        Orientation::Horizontal => viewport.clamp_y(position),
    }
}

/// Append a guide at `offset` (clamped to the page) and return its reference.
pub fn add_guide(guides: &mut Guides, orientation: Orientation, offset: f64, viewport: &Viewport) -> GuideRef {
    let list = guides.list_mut(orientation);
    list.push(clamp_guide(offset, orientation, viewport));
    GuideRef::new(orientation, list.len() - 1)
}

/// Move a guide, clamped to the page. Returns false for a stale reference.
pub fn move_guide(guides: &mut Guides, guide: GuideRef, position: f64, viewport: &Viewport) -> bool {
    guides.set(guide, clamp_guide(position, guide.orientation, viewport))
}

/// Remove the referenced guides. Returns how many were removed.
///
/// Removal runs per orientation in descending index order so earlier removals
/// never shift a later target. Stale and duplicate references are skipped.
pub fn delete_guides(guides: &mut Guides, refs: &[GuideRef]) -> usize {
    let mut removed = 0;
    for orientation in [Orientation::Vertical, Orientation::Horizontal] {
        let mut indices: Vec<usize> = refs.iter().filter(|r| r.orientation == orientation).map(|r| r.index).collect();
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();
        let list = guides.list_mut(orientation);
        for index in indices {
            if index < list.len() {
                list.remove(index);
                removed += 1;
            }
        }
    }
    removed
}

/// Continue the spacing of the selected guides past the last one.
///
/// `selected` must hold at least two positions of `orientation`. Spacing is
/// the gap between the two lowest selected positions. `count` candidates are
/// generated past the highest selected guide; any that already exists is
/// skipped. A candidate past the page edge lands on the edge and ends the run.
/// Returns references to the new guides.
pub fn cascade_guides(
    guides: &mut Guides,
    selected: &[f64],
    count: usize,
    orientation: Orientation,
    viewport: &Viewport,
) -> Vec<GuideRef> {
    let mut sorted = selected.to_vec();
    sorted.sort_by(f64::total_cmp);
    let (Some(&first), Some(&second), Some(&last)) = (sorted.first(), sorted.get(1), sorted.last()) else {
        return Vec::new();
    };
    let spacing = second - first;
    if spacing <= 0.0 {
        return Vec::new();
    }

    let list = guides.list_mut(orientation);
    let mut created = Vec::new();
    let mut position = last;
    for _ in 0..count {
        position += spacing;
        let candidate = clamp_guide(position, orientation, viewport);
        if !list.iter().any(|&g| (g - candidate).abs() < f64::EPSILON) {
            list.push(candidate);
            created.push(GuideRef::new(orientation, list.len() - 1));
        }
        if candidate < position {
            break;
        }
    }
    created
}
