#![allow(clippy::float_cmp)]

use super::*;
use crate::finalize::{Size, parse_custom_shape};
use crate::shape::ShapeInProgress;

// =============================================================
// Helpers
// =============================================================

/// Element the same size as a 1000x600 viewport at the origin, so screen
/// pixels map 1:1 onto surface units.
fn unit_bbox() -> BoundingBox {
    BoundingBox::new(0.0, 0.0, 1000.0, 600.0)
}

fn unit_core() -> BuilderCore {
    let mut core = BuilderCore::new();
    core.set_viewport(Viewport { x: 0.0, y: 0.0, width: 1000.0, height: 600.0 });
    core
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn submitted(actions: &[Action]) -> Option<&EntityInput> {
    actions.iter().find_map(|a| match a {
        Action::Submit(input) => Some(input),
        _ => None,
    })
}

fn has_render_needed(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::RenderNeeded))
}

fn validation_message(actions: &[Action]) -> Option<&str> {
    actions.iter().find_map(|a| match a {
        Action::ValidationFailed(msg) => Some(msg.as_str()),
        _ => None,
    })
}

fn ctrl() -> Modifiers {
    Modifiers { ctrl: true, ..Default::default() }
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn new_core_is_idle_rectangle_building() {
    let core = BuilderCore::new();
    assert!(!core.is_drawing());
    assert_eq!(core.mode(), DrawMode::Rectangle);
    assert_eq!(core.target, ShapeKind::Building);
    assert!(core.preview().is_empty());
}

#[test]
fn with_limits_clamps_initial_viewport() {
    let limits = ViewportLimits { surface_width: 800.0, surface_height: 500.0, ..ViewportLimits::default() };
    let core = BuilderCore::with_limits(limits);
    assert!(core.viewport().width <= 800.0);
    assert!(core.viewport().height <= 500.0);
}

// =============================================================
// Clicks
// =============================================================

#[test]
fn click_while_idle_is_ignored() {
    let mut core = unit_core();
    assert!(core.on_click(pt(10.0, 10.0), &unit_bbox()).is_empty());
}

#[test]
fn rectangle_room_end_to_end() {
    let mut core = unit_core();
    core.set_grid(Grid { size: 50.0, snap: false });
    core.set_target(ShapeKind::Room);
    core.start_drawing();

    let first = core.on_click(pt(100.0, 100.0), &unit_bbox());
    assert!(has_render_needed(&first));
    assert!(submitted(&first).is_none());

    let second = core.on_click(pt(300.0, 250.0), &unit_bbox());
    let input = submitted(&second).expect("second corner should submit");
    assert_eq!(input.kind, ShapeKind::Room);
    assert_eq!(input.map_position_x, 100.0);
    assert_eq!(input.map_position_y, 100.0);
    assert_eq!(input.size, Some(Size { width: 200.0, height: 150.0 }));
    assert!(input.custom_shape.is_none());
    assert!(!core.is_drawing(), "accumulator resets before the host persists");
}

#[test]
fn freehand_snapped_building_end_to_end() {
    let mut core = unit_core();
    core.set_mode(DrawMode::Freehand);
    core.set_grid(Grid { size: 50.0, snap: true });
    core.set_target(ShapeKind::Building);
    core.start_drawing();

    for p in [pt(12.0, 58.0), pt(240.0, 10.0), pt(255.0, 300.0)] {
        let actions = core.on_click(p, &unit_bbox());
        assert!(submitted(&actions).is_none());
    }
    assert_eq!(core.preview(), vec![pt(0.0, 50.0), pt(250.0, 0.0), pt(250.0, 300.0)]);

    let actions = core.finish();
    let input = submitted(&actions).expect("finish should submit");
    let outline = parse_custom_shape(input.custom_shape.as_deref().expect("outline stored")).unwrap();
    assert_eq!(outline.len(), 3);
    for p in &outline {
        assert_eq!(p.x % 50.0, 0.0, "{p:?}");
        assert_eq!(p.y % 50.0, 0.0, "{p:?}");
    }
    assert_eq!(input.map_position_x, 0.0);
    assert_eq!(input.map_position_y, 0.0);
}

#[test]
fn freehand_click_near_start_auto_closes() {
    let mut core = unit_core();
    core.set_mode(DrawMode::Freehand);
    core.set_grid(Grid { size: 20.0, snap: true });
    core.set_target(ShapeKind::Hallway);
    core.start_drawing();

    core.on_click(pt(100.0, 100.0), &unit_bbox());
    core.on_click(pt(400.0, 100.0), &unit_bbox());
    core.on_click(pt(400.0, 140.0), &unit_bbox());
    let actions = core.on_click(pt(110.0, 110.0), &unit_bbox());

    let input = submitted(&actions).expect("closing click should submit");
    assert_eq!(input.kind, ShapeKind::Hallway);
    assert_eq!(input.size, Some(Size { width: 300.0, height: 40.0 }));
    assert!(!core.is_drawing());
}

#[test]
fn clicks_are_mapped_through_viewport() {
    let mut core = BuilderCore::new();
    core.set_grid(Grid { size: 10.0, snap: false });
    core.set_target(ShapeKind::Room);
    core.set_viewport(Viewport { x: 1000.0, y: 500.0, width: 2000.0, height: 1200.0 });
    let bbox = BoundingBox::new(50.0, 50.0, 1000.0, 600.0);
    core.start_drawing();

    core.on_click(pt(50.0, 50.0), &bbox);
    let actions = core.on_click(pt(150.0, 100.0), &bbox);
    let input = submitted(&actions).unwrap();
    assert_eq!(input.map_position_x, 1000.0);
    assert_eq!(input.map_position_y, 500.0);
    assert_eq!(input.size, Some(Size { width: 200.0, height: 100.0 }));
}

// =============================================================
// Finish / undo / cancel
// =============================================================

#[test]
fn finish_with_two_points_reports_validation_and_keeps_drawing() {
    let mut core = unit_core();
    core.set_mode(DrawMode::Freehand);
    core.start_drawing();
    core.on_click(pt(0.0, 0.0), &unit_bbox());
    core.on_click(pt(200.0, 0.0), &unit_bbox());

    let actions = core.finish();
    assert!(validation_message(&actions).is_some_and(|m| m.contains("need at least 3 points")));
    assert!(core.is_drawing());
    assert_eq!(core.preview().len(), 2);
}

#[test]
fn finish_while_idle_reports_validation() {
    let mut core = unit_core();
    let actions = core.finish();
    assert_eq!(validation_message(&actions), Some("not drawing"));
}

#[test]
fn undo_removes_last_point() {
    let mut core = unit_core();
    core.set_mode(DrawMode::Freehand);
    core.start_drawing();
    core.on_click(pt(0.0, 0.0), &unit_bbox());
    core.on_click(pt(200.0, 0.0), &unit_bbox());
    core.undo();
    assert_eq!(core.draw_state(), &DrawState::Drawing(ShapeInProgress::Freehand { points: vec![pt(0.0, 0.0)] }));
}

#[test]
fn escape_cancels_drawing() {
    let mut core = unit_core();
    core.start_drawing();
    core.on_click(pt(0.0, 0.0), &unit_bbox());
    let actions = core.on_key_down(&Key("Escape".into()), Modifiers::default());
    assert!(has_render_needed(&actions));
    assert!(!core.is_drawing());
}

#[test]
fn enter_finishes_drawing() {
    let mut core = unit_core();
    core.set_mode(DrawMode::Freehand);
    core.start_drawing();
    for p in [pt(0.0, 0.0), pt(200.0, 0.0), pt(100.0, 200.0)] {
        core.on_click(p, &unit_bbox());
    }
    let actions = core.on_key_down(&Key("Enter".into()), Modifiers::default());
    assert!(submitted(&actions).is_some());
}

#[test]
fn ctrl_z_undoes_but_plain_z_does_not() {
    let mut core = unit_core();
    core.set_mode(DrawMode::Freehand);
    core.start_drawing();
    core.on_click(pt(0.0, 0.0), &unit_bbox());

    assert!(core.on_key_down(&Key("z".into()), Modifiers::default()).is_empty());
    assert_eq!(core.preview().len(), 1);

    core.on_key_down(&Key("z".into()), ctrl());
    assert!(core.preview().is_empty());
}

#[test]
fn keys_while_idle_are_ignored() {
    let mut core = unit_core();
    assert!(core.on_key_down(&Key("Enter".into()), Modifiers::default()).is_empty());
}

#[test]
fn set_mode_discards_progress() {
    let mut core = unit_core();
    core.start_drawing();
    core.on_click(pt(0.0, 0.0), &unit_bbox());
    core.set_mode(DrawMode::Freehand);
    assert!(!core.is_drawing());
}

// =============================================================
// Viewport
// =============================================================

#[test]
fn wheel_down_zooms_out_towards_cursor() {
    let mut core = BuilderCore::new();
    core.set_viewport(Viewport { x: 1000.0, y: 500.0, width: 2000.0, height: 1200.0 });
    let bbox = BoundingBox::new(0.0, 0.0, 1000.0, 600.0);

    let actions = core.on_wheel(pt(500.0, 300.0), &bbox, 120.0);
    assert!(actions.iter().any(|a| matches!(a, Action::ViewportChanged(_))));
    assert!((core.viewport().width - 2200.0).abs() < 1e-9);
    // Cursor sat on the viewport centre, so the centre stays put.
    assert!((core.viewport().x + core.viewport().width / 2.0 - 2000.0).abs() < 1e-9);
}

#[test]
fn wheel_up_zooms_in() {
    let mut core = BuilderCore::new();
    let before = core.viewport().width;
    core.on_wheel(pt(0.0, 0.0), &unit_bbox(), -120.0);
    assert!(core.viewport().width < before);
}

#[test]
fn wheel_with_zero_delta_is_noop() {
    let mut core = BuilderCore::new();
    assert!(core.on_wheel(pt(0.0, 0.0), &unit_bbox(), 0.0).is_empty());
}

#[test]
fn pan_at_surface_origin_emits_nothing() {
    let mut core = BuilderCore::new();
    // Default viewport sits at the origin; dragging right cannot move further left.
    assert!(core.on_pan(pt(100.0, 100.0), &unit_bbox()).is_empty());
}

#[test]
fn pan_moves_viewport() {
    let mut core = BuilderCore::new();
    let actions = core.on_pan(pt(-100.0, -50.0), &unit_bbox());
    assert!(!actions.is_empty());
    assert!(core.viewport().x > 0.0);
    assert!(core.viewport().y > 0.0);
}

// =============================================================
// Serialization for the host
// =============================================================

#[test]
fn actions_serialize_with_type_tag() {
    let json = serde_json::to_value(Action::RenderNeeded).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "render_needed" }));
    let json = serde_json::to_value(Action::ValidationFailed("x".into())).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "validation_failed", "payload": "x" }));
}

// =============================================================
// Settings
// =============================================================

#[test]
fn set_grid_moves_auto_close_radius() {
    let mut core = unit_core();
    core.set_mode(DrawMode::Freehand);
    core.set_grid(Grid { size: 50.0, snap: false });
    core.set_target(ShapeKind::Room);
    core.start_drawing();

    for p in [pt(0.0, 0.0), pt(500.0, 0.0), pt(500.0, 500.0)] {
        core.on_click(p, &unit_bbox());
    }
    // 60 is outside the default 2 * 20 radius but inside 2 * 50.
    let actions = core.on_click(pt(60.0, 0.0), &unit_bbox());
    assert!(submitted(&actions).is_some(), "{actions:?}");
    assert!(!core.is_drawing());
    assert_eq!(core.grid(), Grid { size: 50.0, snap: false });
}

#[test]
fn set_viewport_clamps_to_surface() {
    let mut core = BuilderCore::new();
    let actions = core.set_viewport(Viewport { x: 4900.0, y: -10.0, width: 20_000.0, height: 100.0 });
    assert!(actions.iter().any(|a| matches!(a, Action::ViewportChanged(_))));

    let limits = core.limits();
    let v = core.viewport();
    assert!(v.width <= limits.surface_width);
    assert!(v.height >= limits.min_height);
    assert!(v.x + v.width <= limits.surface_width);
    assert_eq!(v.y, 0.0);
}

#[test]
fn set_limits_reclamps_viewport() {
    let mut core = BuilderCore::new();
    let limits = ViewportLimits { surface_width: 800.0, surface_height: 500.0, ..ViewportLimits::default() };
    let actions = core.set_limits(limits);
    assert!(!actions.is_empty());
    assert_eq!(core.limits(), limits);
    assert!(core.viewport().width <= 800.0);
    assert!(core.viewport().height <= 500.0);
}
