//! Pan/zoom camera for the floating canvas and the coordinate conversions
//! between screen space and canvas-local space.
//!
//! Card positions are always stored in canvas-local (untransformed) pixels.
//! The camera composes `translate(pan) · scale(zoom)` around the canvas
//! centre, so a pointer delta only needs to be divided by the zoom factor to
//! become a canvas-local delta; the pan offset cancels out.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ZOOM_BUTTON_STEP, ZOOM_DEFAULT, ZOOM_MAX, ZOOM_MIN, ZOOM_WHEEL_STEP};

/// A point in either screen or canvas-local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    #[must_use]
    pub fn offset(self, delta: Point) -> Self {
        Self { x: self.x + delta.x, y: self.y + delta.y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn delta_from(self, other: Point) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }
}

/// Width/height pair in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True until a real measurement with positive extent has arrived.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Axis-aligned rectangle of allowed values for a point.
///
/// Used both for card placement constraints (canvas-local) and for the pan
/// drag bounds (screen pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    /// The degenerate rectangle used before geometry is known and while locked.
    pub const ZERO: Self = Self { left: 0.0, right: 0.0, top: 0.0, bottom: 0.0 };

    #[must_use]
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self { left, right, top, bottom }
    }

    /// Clamp a point into the rectangle. The lower edge wins if the
    /// rectangle is inverted.
    #[must_use]
    pub fn clamp(&self, point: Point) -> Point {
        Point {
            x: point.x.min(self.right).max(self.left),
            y: point.y.min(self.bottom).max(self.top),
        }
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// Convert a screen-space pointer delta to a canvas-local delta.
///
/// Only the zoom factor matters: pan translates the whole container
/// uniformly and therefore never changes the ratio.
#[must_use]
pub fn screen_delta_to_canvas_delta(delta: Point, zoom: f64) -> Point {
    let zoom = zoom.max(f64::EPSILON);
    Point { x: delta.x / zoom, y: delta.y / zoom }
}

/// Zoom limits and step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomPolicy {
    pub min: f64,
    pub max: f64,
    /// Change per zoom button press.
    pub button_step: f64,
    /// Change per ctrl+wheel tick.
    pub wheel_step: f64,
}

impl Default for ZoomPolicy {
    fn default() -> Self {
        Self { min: ZOOM_MIN, max: ZOOM_MAX, button_step: ZOOM_BUTTON_STEP, wheel_step: ZOOM_WHEEL_STEP }
    }
}

impl ZoomPolicy {
    #[must_use]
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.min(self.max).max(self.min)
    }
}

/// Camera state for the floating canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom) applied around the canvas centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: ZOOM_DEFAULT }
    }
}

impl Camera {
    #[must_use]
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.pan_x = pan.x;
        self.pan_y = pan.y;
    }

    /// Set the zoom factor, clamped to the policy limits.
    pub fn set_zoom(&mut self, zoom: f64, policy: &ZoomPolicy) {
        self.zoom = policy.clamp(zoom);
    }

    pub fn zoom_in(&mut self, policy: &ZoomPolicy) {
        self.set_zoom(self.zoom + policy.button_step, policy);
    }

    pub fn zoom_out(&mut self, policy: &ZoomPolicy) {
        self.set_zoom(self.zoom - policy.button_step, policy);
    }

    /// Apply one ctrl+wheel tick. Scrolling down (`dy > 0`) zooms out.
    pub fn zoom_by_wheel(&mut self, dy: f64, policy: &ZoomPolicy) {
        let step = if dy > 0.0 { -policy.wheel_step } else { policy.wheel_step };
        self.set_zoom(self.zoom + step, policy);
    }

    /// Back to 100% with no pan.
    pub fn reset_view(&mut self) {
        *self = Self::default();
    }

    /// Zoom as a whole percentage for the toolbar label.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round().max(0.0) as u32
    }

    /// CSS `transform` value for the canvas container.
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!("translate({}px, {}px) scale({})", self.pan_x, self.pan_y, self.zoom)
    }

    /// Convert a viewport-relative screen point into canvas-local coordinates.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point, canvas: Size) -> Point {
        let cx = canvas.width * 0.5;
        let cy = canvas.height * 0.5;
        let zoom = self.zoom.max(f64::EPSILON);
        Point {
            x: cx + (screen.x - self.pan_x - cx) / zoom,
            y: cy + (screen.y - self.pan_y - cy) / zoom,
        }
    }

    /// Convert a canvas-local point into viewport-relative screen coordinates.
    #[must_use]
    pub fn canvas_to_screen(&self, local: Point, canvas: Size) -> Point {
        let cx = canvas.width * 0.5;
        let cy = canvas.height * 0.5;
        Point {
            x: cx + self.pan_x + (local.x - cx) * self.zoom,
            y: cy + self.pan_y + (local.y - cy) * self.zoom,
        }
    }
}

/// Bounds for the pan offset so the scaled canvas can never leave the viewport.
///
/// An unmeasured viewport yields [`Bounds::ZERO`].
#[must_use]
pub fn pan_bounds(canvas: Size, viewport: Size, zoom: f64) -> Bounds {
    if viewport.is_empty() {
        return Bounds::ZERO;
    }
    let half_w = (canvas.width * zoom - viewport.width) / 2.0;
    let half_h = (canvas.height * zoom - viewport.height) / 2.0;
    Bounds {
        left: (-half_w).min(0.0),
        right: half_w.max(0.0),
        top: (-half_h).min(0.0),
        bottom: half_h.max(0.0),
    }
}

/// Rubber-band a raw pan offset against its bounds: inside the bounds the
/// offset passes through, outside only `elasticity` of the overshoot is kept.
#[must_use]
pub fn elastic_pan(raw: Point, bounds: &Bounds, elasticity: f64) -> Point {
    Point {
        x: elastic_axis(raw.x, bounds.left, bounds.right, elasticity),
        y: elastic_axis(raw.y, bounds.top, bounds.bottom, elasticity),
    }
}

fn elastic_axis(value: f64, min: f64, max: f64, elasticity: f64) -> f64 {
    if value < min {
        min + (value - min) * elasticity
    } else if value > max {
        max + (value - max) * elasticity
    } else {
        value
    }
}
