#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::SNAP_THRESHOLD_PX;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// --- Scalars ---

#[test]
fn to_screen_multiplies_by_scale() {
    assert_eq!(to_screen(10.0, 2.0), 20.0);
    assert_eq!(to_screen(-4.0, 0.5), -2.0);
}

#[test]
fn to_page_divides_by_scale() {
    assert_eq!(to_page(20.0, 2.0), 10.0);
    assert_eq!(to_page(3.0, 1.5), 2.0);
}

#[test]
fn scalar_round_trip_across_scales() {
    let values = [0.0, 1.0, -1.0, 0.1, 12.345, 612.0, 792.0, -1000.25, 1e-6, 1e6];
    let scales = [0.1, 0.25, 0.75, 1.0, 1.333, 2.0, 3.0, 7.5];
    for &scale in &scales {
        for &v in &values {
            let back = to_page(to_screen(v, scale), scale);
            assert!(approx_eq(back, v), "scale {scale} value {v} came back as {back}");
        }
    }
}

// --- Viewport ---

#[test]
fn viewport_default_is_letter_at_unit_scale() {
    let vp = Viewport::default();
    assert_eq!(vp.scale(), 1.0);
    assert_eq!(vp.page_width, 612.0);
    assert_eq!(vp.page_height, 792.0);
}

#[test]
fn viewport_new_rejects_non_positive_scale() {
    assert_eq!(Viewport::new(0.0).scale(), 1.0);
    assert_eq!(Viewport::new(-2.0).scale(), 1.0);
    assert_eq!(Viewport::new(f64::NAN).scale(), 1.0);
    assert_eq!(Viewport::new(2.5).scale(), 2.5);
}

#[test]
fn set_scale_ignores_invalid_values() {
    let mut vp = Viewport::new(2.0);
    assert!(!vp.set_scale(0.0));
    assert!(!vp.set_scale(f64::INFINITY));
    assert_eq!(vp.scale(), 2.0);
    assert!(vp.set_scale(0.5));
    assert_eq!(vp.scale(), 0.5);
}

#[test]
fn point_round_trip() {
    let vp = Viewport::new(1.75);
    let p = PagePoint::new(123.4, 567.8);
    let back = vp.to_page(vp.to_screen(p));
    assert!(approx_eq(back.x, p.x));
    assert!(approx_eq(back.y, p.y));
}

#[test]
fn snap_tolerance_shrinks_when_zoomed_in() {
    assert_eq!(Viewport::new(1.0).snap_tolerance(SNAP_THRESHOLD_PX), 5.0);
    assert_eq!(Viewport::new(2.0).snap_tolerance(SNAP_THRESHOLD_PX), 2.5);
    assert_eq!(Viewport::new(0.5).snap_tolerance(SNAP_THRESHOLD_PX), 10.0);
}

#[test]
fn clamp_keeps_guides_on_page() {
    let vp = Viewport::default();
    assert_eq!(vp.clamp_x(-5.0), 0.0);
    assert_eq!(vp.clamp_x(700.0), 612.0);
    assert_eq!(vp.clamp_y(800.0), 792.0);
    assert_eq!(vp.clamp_y(400.0), 400.0);
}

#[test]
fn screen_point_distance() {
    let a = ScreenPoint::new(0.0, 0.0);
    let b = ScreenPoint::new(3.0, 4.0);
    assert_eq!(a.distance(b), 5.0);
}
