//! Input model: modifier keys, mouse buttons, and the gesture state machine.
//!
//! `InputState` is the gesture tracked between pointer-down and pointer-up.
//! A gesture is either a background pan or a card drag; only one can be
//! active at a time. Card drags move incrementally: each pointer move is
//! converted to a canvas-local delta, added to the card's current position,
//! and clamped, so the card never renders outside its constraints.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::{Point, screen_delta_to_canvas_delta};
use crate::goal::GoalId;
use crate::layout::Constraints;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas by dragging its background.
    Panning {
        /// Screen-space pointer position at pointer-down.
        start_screen: Point,
        /// Pan offset at pointer-down.
        start_pan: Point,
    },
    /// The user is dragging a card.
    DraggingCard {
        /// Goal whose card is being dragged.
        id: GoalId,
        /// Screen-space pointer position at the previous event.
        last_screen: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }

    /// Goal currently being dragged, if any.
    #[must_use]
    pub fn dragged_card(&self) -> Option<&GoalId> {
        match self {
            Self::DraggingCard { id, .. } => Some(id),
            _ => None,
        }
    }
}

/// One card-drag step: the pointer moved `screen_delta` while the canvas is
/// scaled by `zoom`. Returns the new clamped canvas-local position.
#[must_use]
pub fn drag_step(current: Point, screen_delta: Point, zoom: f64, constraints: &Constraints) -> Point {
    let delta = screen_delta_to_canvas_delta(screen_delta, zoom);
    constraints.clamp(current.offset(delta))
}
