use uuid::Uuid;

use super::*;
use crate::doc::Field;

fn ids(n: usize) -> Vec<FieldId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

// =============================================================
// press_field
// =============================================================

#[test]
fn press_unselected_collapses_to_it() {
    let ids = ids(3);
    let mut sel = Selection::default();
    sel.set_fields(vec![ids[0], ids[1]]);
    assert!(sel.press_field(ids[2], false));
    assert_eq!(sel.fields(), &[ids[2]]);
}

#[test]
fn press_selected_member_keeps_group() {
    let ids = ids(3);
    let mut sel = Selection::default();
    sel.set_fields(vec![ids[0], ids[1], ids[2]]);
    assert!(sel.press_field(ids[1], false));
    assert_eq!(sel.fields(), &[ids[0], ids[1], ids[2]]);
}

#[test]
fn shift_press_toggles_membership() {
    let ids = ids(2);
    let mut sel = Selection::default();
    assert!(sel.press_field(ids[0], true));
    assert!(sel.press_field(ids[1], true));
    assert_eq!(sel.fields(), &[ids[0], ids[1]]);
    assert!(!sel.press_field(ids[0], true));
    assert_eq!(sel.fields(), &[ids[1]]);
}

#[test]
fn press_field_clears_guides() {
    let ids = ids(1);
    let mut sel = Selection::default();
    sel.set_guides(vec![GuideRef::new(Orientation::Vertical, 0)]);
    sel.press_field(ids[0], false);
    assert!(sel.guides().is_empty());
    assert_eq!(sel.single_field(), Some(ids[0]));
}

// =============================================================
// press_guide
// =============================================================

#[test]
fn press_guide_mirrors_field_rules() {
    let a = GuideRef::new(Orientation::Vertical, 0);
    let b = GuideRef::new(Orientation::Horizontal, 0);
    let mut sel = Selection::default();
    sel.press_guide(a, false);
    sel.press_guide(b, true);
    assert_eq!(sel.guides(), &[a, b]);
    // Pressing a member without shift keeps the group.
    sel.press_guide(a, false);
    assert_eq!(sel.guides(), &[a, b]);
    // Shift on a member removes it.
    assert!(!sel.press_guide(b, true));
    assert_eq!(sel.guides(), &[a]);
}

// =============================================================
// Misc
// =============================================================

#[test]
fn single_field_requires_exactly_one() {
    let ids = ids(2);
    let mut sel = Selection::default();
    assert_eq!(sel.single_field(), None);
    sel.set_fields(ids.clone());
    assert_eq!(sel.single_field(), None);
    sel.set_fields(vec![ids[1]]);
    assert_eq!(sel.single_field(), Some(ids[1]));
}

#[test]
fn retain_existing_drops_stale_ids() {
    let mut doc = Document::default();
    let f = Field::new(1, Rect::new(0.0, 0.0, 10.0, 10.0), "a");
    let live = f.id;
    doc.push(f);
    let mut sel = Selection::default();
    sel.set_fields(vec![live, Uuid::new_v4()]);
    sel.retain_existing(&doc);
    assert_eq!(sel.fields(), &[live]);
}

#[test]
fn guide_positions_sorted_and_filtered() {
    let guides = Guides { vertical: vec![300.0, 100.0], horizontal: vec![50.0] };
    let mut sel = Selection::default();
    sel.set_guides(vec![
        GuideRef::new(Orientation::Vertical, 0),
        GuideRef::new(Orientation::Horizontal, 0),
        GuideRef::new(Orientation::Vertical, 1),
        GuideRef::new(Orientation::Vertical, 9),
    ]);
    assert_eq!(sel.guide_positions(&guides, Orientation::Vertical), vec![100.0, 300.0]);
    assert_eq!(sel.guide_positions(&guides, Orientation::Horizontal), vec![50.0]);
}

// =============================================================
// Box membership
// =============================================================

#[test]
fn box_includes_center_on_boundary() {
    let mut doc = Document::default();
    // Center at (50, 50).
    let on_edge = Field::new(1, Rect::new(40.0, 40.0, 20.0, 20.0), "edge");
    // Center at (80, 80), outside.
    let outside = Field::new(1, Rect::new(70.0, 70.0, 20.0, 20.0), "out");
    let edge_id = on_edge.id;
    doc.push(on_edge);
    doc.push(outside);
    let hits = fields_in_box(&doc, 1, &Rect::new(0.0, 0.0, 50.0, 50.0));
    assert_eq!(hits, vec![edge_id]);
}

#[test]
fn box_uses_center_not_overlap() {
    let mut doc = Document::default();
    // Overlaps the box but center (60, 10) is outside.
    doc.push(Field::new(1, Rect::new(0.0, 0.0, 120.0, 20.0), "wide"));
    assert!(fields_in_box(&doc, 1, &Rect::new(0.0, 0.0, 50.0, 50.0)).is_empty());
}

#[test]
fn box_ignores_other_pages() {
    let mut doc = Document::default();
    let mut f = Field::new(1, Rect::new(0.0, 0.0, 10.0, 10.0), "p2");
    f.page = 2;
    doc.push(f);
    assert!(fields_in_box(&doc, 1, &Rect::new(0.0, 0.0, 50.0, 50.0)).is_empty());
}

#[test]
fn box_selects_crossing_guides() {
    let guides = Guides { vertical: vec![10.0, 100.0], horizontal: vec![50.0, 500.0] };
    let hits = guides_in_box(&guides, &Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(
        hits,
        vec![
            GuideRef::new(Orientation::Vertical, 0),
            GuideRef::new(Orientation::Vertical, 1),
            GuideRef::new(Orientation::Horizontal, 0),
        ]
    );
}

#[test]
fn retain_existing_drops_stale_guides() {
    let doc = Document::new(vec![], Guides { vertical: vec![10.0], horizontal: vec![] });
    let mut sel = Selection::default();
    sel.set_guides(vec![GuideRef::new(Orientation::Vertical, 0), GuideRef::new(Orientation::Vertical, 1)]);
    sel.retain_existing(&doc);
    assert_eq!(sel.guides(), &[GuideRef::new(Orientation::Vertical, 0)]);
}
