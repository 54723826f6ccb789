//! Geometry and input core for the campus map shape builder.
//!
//! This crate is compiled to WebAssembly and runs in the admin dashboard. It
//! owns the drawing lifecycle of a building, room, or hallway footprint:
//! translating pointer positions into drawing-surface coordinates, snapping
//! them to the grid, accumulating them into a closed shape, and turning the
//! finished shape into entity input. The host is responsible only for wiring
//! DOM events to the engine and persisting the resulting
//! [`engine::Action::Submit`] payloads through the entity store.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::BuilderCore`] wiring the pieces together |
//! | [`viewport`] | Pan/zoom viewBox and screen/surface conversions |
//! | [`snap`] | Grid quantization |
//! | [`shape`] | Draw modes and the shape accumulator state machine |
//! | [`finalize`] | Bounding box and custom-shape serialization |
//! | [`wasm`] | `wasm-bindgen` host wrapper |
//! | [`consts`] | Shared numeric defaults (surface size, zoom step, grid) |

pub mod consts;
pub mod engine;
pub mod finalize;
pub mod shape;
pub mod snap;
pub mod viewport;
pub mod wasm;
