//! Floating free-positioning canvas for the goal tracker.
//!
//! Goals are shown as cards on a pannable, zoomable surface. Each card starts
//! in a deterministic grid slot and can be dragged anywhere inside the canvas
//! bounds; positions survive reloads through browser-local storage. All logic
//! is DOM-free and runs natively under test. The optional `web` feature adds
//! the browser bindings: `localStorage`, the save timer, and viewport
//! measurement.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Canvas container, [`engine::EngineCore`], and host [`engine::Action`]s |
//! | [`layout`] | Card presets, grid shape, and canvas extent |
//! | [`positions`] | Position map operations and the debounced [`positions::PositionStore`] |
//! | [`camera`] | Pan/zoom camera, pan bounds, and coordinate conversions |
//! | [`input`] | Input event types, the gesture state machine, and the drag step |
//! | [`hit`] | Hit-testing pointer positions against cards |
//! | [`render`] | Serializable per-frame [`render::Scene`] |
//! | [`goal`] | Goal model supplied by the host |
//! | [`storage`] | Key/value [`storage::Storage`] capability and an in-memory backend |
//! | [`debounce`] | Deadline-based value debouncer |
//! | [`config`] | [`config::CanvasConfig`] from defaults, environment, or JSON |
//! | [`error`] | Error types and stable error codes |
//! | [`consts`] | Shared numeric constants (presets, zoom limits, debounce windows) |
//! | `web` | Browser bindings (`web` feature) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod goal;
pub mod hit;
pub mod input;
pub mod layout;
pub mod positions;
pub mod render;
pub mod storage;
#[cfg(feature = "web")]
pub mod web;
