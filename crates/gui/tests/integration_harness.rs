//! Integration tests for TestHarness.
//!
//! Drives the click → closure → extrusion pipeline headlessly.

use footprint_gui_lib::harness::TestHarness;
use footprint_gui_lib::state::CaptureEvent;

const L_SHAPE: [[f64; 2]; 7] = [
    [-2.0, -2.0],
    [2.0, -2.0],
    [2.0, 0.0],
    [0.0, 0.0],
    [0.0, 2.0],
    [-2.0, 2.0],
    [-1.9, -1.95],
];

#[test]
fn test_harness_full_session() {
    let mut h = TestHarness::new();
    for p in &L_SHAPE[..6] {
        assert_eq!(h.click_world(p[0], p[1]), Some(CaptureEvent::Appended));
        assert!(!h.is_closed());
        assert!(!h.orbit_enabled());
    }
    assert_eq!(h.click_world(-1.9, -1.95), Some(CaptureEvent::Closed));
    assert!(h.is_closed());
    assert!(h.orbit_enabled());
    assert_eq!(h.height(), 1.0);

    let v = h.validate_mesh().unwrap();
    let errors = v.validate_all();
    assert!(errors.is_empty(), "Validation errors: {:?}", errors);
    assert!(v.assert_dimensions_approx([4.0, 1.0, 4.0], 1e-4));
}

#[test]
fn test_harness_height_changes_replace_mesh() {
    let mut h = TestHarness::new();
    h.trace(&L_SHAPE);

    h.set_height(7.5).unwrap();
    let v = h.validate_mesh().unwrap();
    assert!(v.assert_dimensions_approx([4.0, 7.5, 4.0], 1e-4));

    h.set_height(0.0).unwrap();
    let v = h.validate_mesh().unwrap();
    assert!(v.assert_dimensions_approx([4.0, 0.0, 4.0], 1e-4));
    // Flat footprint: one cap of n - 2 triangles, the closing click is a corner
    assert_eq!(v.triangle_count(), L_SHAPE.len() - 2);

    h.set_height(42.0).unwrap();
    assert_eq!(h.height(), 10.0);
}

#[test]
fn test_harness_closure_only_once() {
    let mut h = TestHarness::new();
    h.trace(&L_SHAPE);
    let before = h.mesh().cloned();

    // Another click near the start neither appends nor rebuilds
    assert_eq!(h.click_world(-2.0, -2.0), Some(CaptureEvent::Ignored));
    assert_eq!(h.click_world(3.0, 3.0), Some(CaptureEvent::Ignored));
    assert_eq!(h.point_count(), L_SHAPE.len());
    assert_eq!(h.mesh().cloned(), before);
}

#[test]
fn test_harness_misses_leave_state_untouched() {
    let mut h = TestHarness::new();
    h.click_world(0.0, 0.0);
    assert_eq!(h.click_world(5.5, 0.0), None);
    assert_eq!(h.click_world(0.0, -12.0), None);
    assert_eq!(h.point_count(), 1);
    assert!(h.outline().is_none());
}

#[test]
fn test_harness_outline_preview() {
    let mut h = TestHarness::new();
    h.click_world(0.0, 0.0);
    h.click_world(1.0, 0.0);
    assert_eq!(h.outline().map(|o| o.len()), Some(2));
    h.click_world(1.0, 1.0);
    h.click_world(0.1, 0.0);
    assert!(h.is_closed());
    assert!(h.outline().is_none());
}

#[test]
fn test_harness_two_points_near_start_do_not_close() {
    let mut h = TestHarness::new();
    h.click_world(0.0, 0.0);
    assert_eq!(h.click_world(0.05, 0.0), Some(CaptureEvent::Appended));
    assert!(!h.is_closed());
    assert!(h.mesh().is_none());
}

#[test]
fn test_harness_three_point_closure_builds() {
    let mut h = TestHarness::new();
    assert_eq!(h.trace(&[[0.0, 0.0], [2.0, 0.0], [0.1, 0.15]]), Some(CaptureEvent::Closed));
    assert!(h.state.building.error().is_none());
    let v = h.validate_mesh().unwrap();
    assert!(v.validate_all().is_empty(), "Validation errors: {:?}", v.validate_all());
    assert!(v.assert_dimensions_approx([2.0, 1.0, 0.15], 1e-5));
}

#[test]
fn test_harness_extents_follow_captured_outline() {
    let mut h = TestHarness::new();
    h.trace(&[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [-0.19, 0.0]]);
    assert!(h.is_closed());
    h.set_height(3.0).unwrap();
    let v = h.validate_mesh().unwrap();
    assert!(v.validate_all().is_empty());
    assert!(v.assert_dimensions_approx([2.19, 3.0, 2.0], 1e-5));
    let aabb = v.aabb();
    assert!((aabb.min.x + 0.19).abs() < 1e-5);
    assert!(aabb.min.y.abs() < 1e-6);
}

#[test]
fn test_harness_degenerate_closure_has_no_mesh() {
    let mut h = TestHarness::new();
    // Collinear corners: closes, but there is nothing to extrude
    h.trace(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [0.1, 0.0]]);
    assert!(h.is_closed());
    assert!(h.mesh().is_none());
    assert!(h.state.building.error().is_some());
}

#[test]
fn test_harness_ndc_clicks_trace_outline() {
    let mut h = TestHarness::new();
    for (x, y) in [(-0.2, -0.2), (0.2, -0.2), (0.2, 0.2), (-0.2, 0.2)] {
        assert_eq!(h.click_ndc(x, y), Some(CaptureEvent::Appended));
    }
    assert_eq!(h.click_ndc(-0.2, -0.19), Some(CaptureEvent::Closed));
    let v = h.validate_mesh().unwrap();
    // 0.2 NDC at distance 10 with a 90° fov spans 2 world units
    assert!(v.assert_dimensions_approx([4.0, 1.0, 4.0], 0.05));
}
