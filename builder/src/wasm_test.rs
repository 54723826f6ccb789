#![allow(clippy::float_cmp)]

use super::*;
use serde_json::Value;

/// A builder whose element matches the initial 2000x1200 viewBox, so client
/// pixels map 1:1 onto surface units.
fn unit_builder() -> Builder {
    let mut builder = Builder::new(5000.0, 3000.0);
    builder.set_grid(10.0, false);
    builder
}

fn click(builder: &mut Builder, x: f64, y: f64) -> Value {
    let json = builder.on_click(x, y, 0.0, 0.0, 2000.0, 1200.0);
    serde_json::from_str(&json).unwrap()
}

#[test]
fn rectangle_room_submits_json() {
    let mut builder = unit_builder();
    builder.set_target("room");
    builder.start_drawing();
    assert!(builder.is_drawing());

    let first = click(&mut builder, 100.0, 100.0);
    assert_eq!(first, serde_json::json!([{ "type": "render_needed" }]));

    let second = click(&mut builder, 300.0, 250.0);
    assert_eq!(second[0]["type"], "submit");
    let payload = &second[0]["payload"];
    assert_eq!(payload["kind"], "room");
    assert_eq!(payload["mapPositionX"], 100.0);
    assert_eq!(payload["mapPositionY"], 100.0);
    assert_eq!(payload["size"], serde_json::json!({ "width": 200.0, "height": 150.0 }));
    assert!(payload.get("customShape").is_none());
    assert!(!builder.is_drawing());
}

#[test]
fn freehand_finish_reports_validation_then_submits() {
    let mut builder = unit_builder();
    builder.set_mode("freehand");
    builder.set_target("building");
    builder.start_drawing();
    click(&mut builder, 0.0, 0.0);
    click(&mut builder, 400.0, 0.0);

    let rejected: Value = serde_json::from_str(&builder.finish()).unwrap();
    assert_eq!(rejected[0]["type"], "validation_failed");
    assert!(builder.is_drawing());

    click(&mut builder, 400.0, 300.0);
    let preview: Value = serde_json::from_str(&builder.preview()).unwrap();
    assert_eq!(preview.as_array().map(Vec::len), Some(3));

    let done: Value = serde_json::from_str(&builder.finish()).unwrap();
    assert_eq!(done[0]["type"], "submit");
    assert_eq!(done[0]["payload"]["kind"], "building");
}

#[test]
fn unknown_mode_and_target_are_ignored() {
    let mut builder = unit_builder();
    builder.set_mode("spline");
    builder.set_target("parking");
    builder.start_drawing();
    click(&mut builder, 0.0, 0.0);
    let done = click(&mut builder, 100.0, 50.0);
    // Still a rectangle building.
    assert_eq!(done[0]["payload"]["kind"], "building");
}

#[test]
fn escape_cancels_and_clears_preview() {
    let mut builder = unit_builder();
    builder.start_drawing();
    click(&mut builder, 10.0, 10.0);
    let actions: Value = serde_json::from_str(&builder.on_key_down("Escape".into(), false, false)).unwrap();
    assert_eq!(actions, serde_json::json!([{ "type": "render_needed" }]));
    assert!(!builder.is_drawing());
    assert_eq!(builder.preview(), "[]");
}

#[test]
fn wheel_updates_view_box() {
    let mut builder = unit_builder();
    assert_eq!(builder.view_box(), "0 0 2000 1200");

    let actions: Value =
        serde_json::from_str(&builder.on_wheel(0.0, 0.0, 120.0, 0.0, 0.0, 2000.0, 1200.0)).unwrap();
    assert_eq!(actions[0]["type"], "viewport_changed");
    let parts: Vec<f64> = builder.view_box().split(' ').map(|p| p.parse().unwrap()).collect();
    assert_eq!(parts[..2], [0.0, 0.0]);
    assert!((parts[2] - 2200.0).abs() < 1e-9);
    assert!((parts[3] - 1320.0).abs() < 1e-9);
}

#[test]
fn small_surface_clamps_initial_view_box() {
    let builder = Builder::new(800.0, 500.0);
    assert_eq!(builder.view_box(), "0 0 800 500");
}
