#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{Binding, FieldStyle};

fn field(x: f64, y: f64, w: f64, h: f64, label: &str) -> Field {
    Field::new(1, Rect::new(x, y, w, h), label)
}

fn bound(mut f: Field) -> Field {
    f.binding = Some(Binding::Column("name".into()));
    f
}

// =============================================================
// cascade_fields_to_guides
// =============================================================

#[test]
fn cascade_stacks_fields_between_guides() {
    let template = field(20.0, 80.0, 120.0, 20.0, "Name");
    let created = cascade_fields_to_guides(&template, &[100.0, 150.0, 220.0, 300.0]);

    assert_eq!(created.len(), 3);
    let ys: Vec<f64> = created.iter().map(|f| f.y).collect();
    let hs: Vec<f64> = created.iter().map(|f| f.height).collect();
    assert_eq!(ys, vec![100.0, 150.0, 220.0]);
    assert_eq!(hs, vec![50.0, 70.0, 20.0]);
    assert!(created.iter().all(|f| f.x == 20.0 && f.width == 120.0));
}

#[test]
fn cascade_ignores_guides_above_template_bottom() {
    let template = field(0.0, 80.0, 50.0, 20.0, "A");
    let created = cascade_fields_to_guides(&template, &[40.0, 99.0, 100.0, 130.0, 160.0]);
    let ys: Vec<f64> = created.iter().map(|f| f.y).collect();
    assert_eq!(ys, vec![100.0, 130.0]);
}

#[test]
fn cascade_sorts_unordered_guides() {
    let template = field(0.0, 0.0, 50.0, 10.0, "A");
    let created = cascade_fields_to_guides(&template, &[60.0, 20.0, 40.0]);
    let ys: Vec<f64> = created.iter().map(|f| f.y).collect();
    assert_eq!(ys, vec![20.0, 40.0]);
    assert_eq!(created[0].height, 20.0);
}

#[test]
fn cascade_needs_two_qualifying_guides() {
    let template = field(0.0, 80.0, 50.0, 20.0, "A");
    assert!(cascade_fields_to_guides(&template, &[]).is_empty());
    assert!(cascade_fields_to_guides(&template, &[120.0]).is_empty());
    assert!(cascade_fields_to_guides(&template, &[10.0, 120.0]).is_empty());
}

#[test]
fn cascade_copies_style_not_binding() {
    let mut template = bound(field(0.0, 0.0, 50.0, 10.0, "Item"));
    template.style.bold = true;
    let created = cascade_fields_to_guides(&template, &[20.0, 40.0, 60.0]);

    assert_eq!(created[0].label, "Item 2");
    assert_eq!(created[1].label, "Item 3");
    for f in &created {
        assert!(f.style.bold);
        assert!(f.binding.is_none());
        assert_ne!(f.id, template.id);
    }
}

// =============================================================
// fill_fields_from_guides
// =============================================================

#[test]
fn fill_rows_span_page_width() {
    let vp = Viewport::default();
    let created = fill_fields_from_guides(&[100.0, 120.0, 150.0], &[], 2, &vp);
    assert_eq!(created.len(), 2);
    assert_eq!(created[0].rect(), Rect::new(0.0, 100.0, 612.0, 20.0));
    assert_eq!(created[1].rect(), Rect::new(0.0, 120.0, 612.0, 30.0));
    assert_eq!(created[0].label, "Row 1");
    assert!(created.iter().all(|f| f.page == 2));
}

#[test]
fn fill_grid_is_row_major() {
    let vp = Viewport::default();
    let created = fill_fields_from_guides(&[200.0, 100.0, 150.0], &[10.0, 60.0, 90.0], 1, &vp);
    assert_eq!(created.len(), 4);
    assert_eq!(created[0].rect(), Rect::new(10.0, 100.0, 50.0, 50.0));
    assert_eq!(created[1].rect(), Rect::new(60.0, 100.0, 30.0, 50.0));
    assert_eq!(created[2].rect(), Rect::new(10.0, 150.0, 50.0, 50.0));
    assert_eq!(created[1].label, "Row 1 Col 2");
    assert_eq!(created[3].label, "Row 2 Col 2");
}

#[test]
fn fill_single_vertical_falls_back_to_rows() {
    let vp = Viewport::default();
    let created = fill_fields_from_guides(&[10.0, 30.0], &[50.0], 1, &vp);
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].width, 612.0);
}

#[test]
fn fill_needs_two_horizontal() {
    let vp = Viewport::default();
    assert!(fill_fields_from_guides(&[10.0], &[10.0, 20.0], 1, &vp).is_empty());
    assert!(fill_fields_from_guides(&[10.0, 10.0], &[], 1, &vp).is_empty());
}

// =============================================================
// merge_fields
// =============================================================

#[test]
fn merge_covers_bounding_box() {
    let a = field(10.0, 10.0, 50.0, 50.0, "First");
    let b = field(40.0, 40.0, 30.0, 30.0, "Last");
    let ids = vec![a.id, b.id];
    let doc = Document::new(vec![a, b], Default::default());

    let (merged, replaced) = merge_fields(&doc, &ids).expect("merged");
    assert_eq!(merged.rect(), Rect::new(10.0, 10.0, 60.0, 60.0));
    assert_eq!(merged.label, "First Last");
    assert_eq!(replaced, ids);
    assert!(!ids.contains(&merged.id));
}

#[test]
fn merge_uses_selection_order_for_labels_and_style() {
    let mut a = field(0.0, 0.0, 10.0, 10.0, "A");
    let mut b = field(20.0, 0.0, 10.0, 10.0, "B");
    a.style = FieldStyle { font_size: 8.0, ..FieldStyle::default() };
    b.style = FieldStyle { font_size: 20.0, ..FieldStyle::default() };
    let b = bound(b);
    let ids = vec![b.id, a.id];
    let doc = Document::new(vec![a, b], Default::default());

    let (merged, _) = merge_fields(&doc, &ids).expect("merged");
    assert_eq!(merged.label, "B A");
    assert_eq!(merged.style.font_size, 20.0);
    assert!(merged.binding.is_none());
}

#[test]
fn merge_skips_other_pages() {
    let a = field(0.0, 0.0, 10.0, 10.0, "A");
    let mut b = field(100.0, 100.0, 10.0, 10.0, "B");
    b.page = 2;
    let c = field(20.0, 20.0, 10.0, 10.0, "C");
    let ids = vec![a.id, b.id, c.id];
    let doc = Document::new(vec![a, b, c], Default::default());

    let (merged, replaced) = merge_fields(&doc, &ids).expect("merged");
    assert_eq!(merged.rect(), Rect::new(0.0, 0.0, 30.0, 30.0));
    assert_eq!(replaced.len(), 2);
}

#[test]
fn merge_needs_two_fields() {
    let a = field(0.0, 0.0, 10.0, 10.0, "A");
    let id = a.id;
    let doc = Document::new(vec![a], Default::default());
    assert!(merge_fields(&doc, &[id]).is_none());
    assert!(merge_fields(&doc, &[id, FieldId::new_v4()]).is_none());
    assert!(merge_fields(&doc, &[]).is_none());
}

// =============================================================
// split
// =============================================================

#[test]
fn split_vertical_at_position() {
    let f = bound(field(0.0, 0.0, 100.0, 40.0, "Addr"));
    let (left, right) = split_field(&f, Orientation::Vertical, 60.0);
    assert_eq!(left.rect(), Rect::new(0.0, 0.0, 60.0, 40.0));
    assert_eq!(right.rect(), Rect::new(60.0, 0.0, 40.0, 40.0));
    assert_eq!(left.label, "Addr 1");
    assert_eq!(right.label, "Addr 2");
    assert!(left.binding.is_none() && right.binding.is_none());
    assert_ne!(left.id, f.id);
    assert_ne!(right.id, f.id);
}

#[test]
fn split_horizontal_at_position() {
    let f = field(10.0, 10.0, 100.0, 40.0, "X");
    let (top, bottom) = split_field(&f, Orientation::Horizontal, 25.0);
    assert_eq!(top.rect(), Rect::new(10.0, 10.0, 100.0, 15.0));
    assert_eq!(bottom.rect(), Rect::new(10.0, 25.0, 100.0, 35.0));
}

#[test]
fn split_position_is_clamped_to_margins() {
    let r = Rect::new(0.0, 0.0, 100.0, 40.0);
    assert_eq!(clamp_split_position(&r, Orientation::Vertical, 2.0), 10.0);
    assert_eq!(clamp_split_position(&r, Orientation::Vertical, 99.0), 90.0);
    assert_eq!(clamp_split_position(&r, Orientation::Horizontal, 0.0), 5.0);
    assert_eq!(clamp_split_position(&r, Orientation::Horizontal, 40.0), 35.0);
}

#[test]
fn split_tiny_field_uses_midpoint() {
    let r = Rect::new(0.0, 0.0, 12.0, 8.0);
    assert_eq!(clamp_split_position(&r, Orientation::Vertical, 1.0), 6.0);
    assert_eq!(clamp_split_position(&r, Orientation::Horizontal, 1.0), 4.0);
}
