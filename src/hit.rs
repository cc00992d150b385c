#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{GUIDE_HIT_PX, HANDLE_RADIUS_PX};
use crate::doc::{Document, FieldId, GuideRef, Orientation, Rect};
use crate::input::Corner;
use crate::selection::{EditMode, Selection};
use crate::viewport::{PagePoint, Viewport};

/// Which part of a field was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Handle(Corner),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Field { id: FieldId, part: HitPart },
    Guide(GuideRef),
}

fn corners(rect: &Rect) -> [(Corner, f64, f64); 4] {
    [
        (Corner::Nw, rect.x, rect.y),
        (Corner::Ne, rect.right(), rect.y),
        (Corner::Sw, rect.x, rect.bottom()),
        (Corner::Se, rect.right(), rect.bottom()),
    ]
}

/// Test what is under `point` on `page`.
///
/// In field mode, resize handles of selected fields win over any body, then
/// bodies are tried topmost (last in the document) first. In guide mode only
/// guides are hit; the nearest one within tolerance wins, earlier guides
/// breaking ties.
#[must_use]
pub fn hit_test(
    point: PagePoint,
    doc: &Document,
    viewport: &Viewport,
    selection: &Selection,
    mode: EditMode,
    page: u32,
) -> Option<Hit> {
    match mode {
        EditMode::Field => hit_field(point, doc, viewport, selection, page),
        EditMode::Guide => hit_guide(point, doc, viewport),
    }
}

fn hit_field(point: PagePoint, doc: &Document, viewport: &Viewport, selection: &Selection, page: u32) -> Option<Hit> {
    let radius = viewport.screen_len_to_page(HANDLE_RADIUS_PX);
    let on_page: Vec<_> = doc.on_page(page).collect();

    for field in on_page.iter().rev().filter(|f| selection.contains_field(&f.id)) {
        for (corner, cx, cy) in corners(&field.rect()) {
            if (point.x - cx).abs() <= radius && (point.y - cy).abs() <= radius {
                return Some(Hit::Field { id: field.id, part: HitPart::Handle(corner) });
            }
        }
    }

    on_page
        .iter()
        .rev()
        .find(|f| f.rect().contains(point.x, point.y))
        .map(|f| Hit::Field { id: f.id, part: HitPart::Body })
}

fn hit_guide(point: PagePoint, doc: &Document, viewport: &Viewport) -> Option<Hit> {
    let tolerance = viewport.screen_len_to_page(GUIDE_HIT_PX);
    let mut best: Option<(GuideRef, f64)> = None;
    for guide in doc.guides.refs() {
        let Some(position) = doc.guides.get(guide) else {
            continue;
        };
        let distance = match guide.orientation {
            Orientation::Vertical => (point.x - position).abs(),
            Orientation::Horizontal => (point.y - position).abs(),
        };
        if distance > tolerance {
            continue;
        }
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((guide, distance));
        }
    }
    best.map(|(guide, _)| Hit::Guide(guide))
}
