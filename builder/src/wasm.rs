//! `wasm-bindgen` surface for the browser host.
//!
//! The host passes raw numbers from DOM events (client coordinates and the
//! element's `getBoundingClientRect()`) and receives actions as a JSON array
//! string. Unknown mode/kind names are ignored and leave the setting unchanged.

use wasm_bindgen::prelude::*;

use crate::engine::{Action, BuilderCore, Key, Modifiers};
use crate::finalize::ShapeKind;
use crate::shape::DrawMode;
use crate::snap::Grid;
use crate::viewport::{BoundingBox, Point, ViewportLimits};

fn to_json(actions: &[Action]) -> String {
    serde_json::json!(actions).to_string()
}

/// The builder engine as seen from JavaScript.
#[wasm_bindgen]
pub struct Builder {
    core: BuilderCore,
}

#[wasm_bindgen]
impl Builder {
    /// Create a builder over a `surface_width` x `surface_height` surface.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(surface_width: f64, surface_height: f64) -> Self {
        let limits = ViewportLimits { surface_width, surface_height, ..ViewportLimits::default() };
        Self { core: BuilderCore::with_limits(limits) }
    }

    /// `"rectangle"` or `"freehand"`.
    pub fn set_mode(&mut self, mode: &str) {
        match mode {
            "rectangle" => self.core.set_mode(DrawMode::Rectangle),
            "freehand" => self.core.set_mode(DrawMode::Freehand),
            _ => {}
        }
    }

    /// `"building"`, `"room"`, or `"hallway"`.
    pub fn set_target(&mut self, kind: &str) {
        if let Some(kind) = ShapeKind::parse(kind) {
            self.core.set_target(kind);
        }
    }

    pub fn set_grid(&mut self, size: f64, snap: bool) {
        self.core.set_grid(Grid { size, snap });
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.core.is_drawing()
    }

    pub fn start_drawing(&mut self) -> String {
        to_json(&self.core.start_drawing())
    }

    pub fn undo(&mut self) -> String {
        to_json(&self.core.undo())
    }

    pub fn cancel(&mut self) -> String {
        to_json(&self.core.cancel())
    }

    pub fn finish(&mut self) -> String {
        to_json(&self.core.finish())
    }

    pub fn on_click(&mut self, client_x: f64, client_y: f64, left: f64, top: f64, width: f64, height: f64) -> String {
        let bbox = BoundingBox::new(left, top, width, height);
        to_json(&self.core.on_click(Point::new(client_x, client_y), &bbox))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn on_wheel(
        &mut self,
        client_x: f64,
        client_y: f64,
        delta_y: f64,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) -> String {
        let bbox = BoundingBox::new(left, top, width, height);
        to_json(&self.core.on_wheel(Point::new(client_x, client_y), &bbox, delta_y))
    }

    pub fn on_pan(&mut self, dx: f64, dy: f64, width: f64, height: f64) -> String {
        let bbox = BoundingBox::new(0.0, 0.0, width, height);
        to_json(&self.core.on_pan(Point::new(dx, dy), &bbox))
    }

    pub fn on_key_down(&mut self, key: String, ctrl: bool, meta: bool) -> String {
        to_json(&self.core.on_key_down(&Key(key), Modifiers { ctrl, meta }))
    }

    /// Current viewBox as `"x y width height"`, ready for the SVG attribute.
    #[must_use]
    pub fn view_box(&self) -> String {
        let v = self.core.viewport();
        format!("{} {} {} {}", v.x, v.y, v.width, v.height)
    }

    /// Preview vertices of the shape in progress as a JSON array of `{x, y}`.
    #[must_use]
    pub fn preview(&self) -> String {
        serde_json::json!(self.core.preview()).to_string()
    }
}

#[cfg(test)]
#[path = "wasm_test.rs"]
mod wasm_test;
