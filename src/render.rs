//! Render snapshot: everything the host needs to draw one frame.
//!
//! This module produces plain data. It never touches the DOM and never
//! mutates application state; [`crate::engine::EngineCore::scene`] builds a
//! [`Scene`] from read-only views of the engine and the host turns it into
//! markup. Every type serializes so the browser binding can hand the whole
//! snapshot to JavaScript as JSON.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::camera::{Bounds, Point, Size};
use crate::goal::{Category, GoalId};

pub const EMPTY_TITLE: &str = "No Goals in Floating View";
pub const EMPTY_MESSAGE: &str = "Add some goals to see them floating here!";
pub const USAGE_HINT: &str = "Drag cards to reposition. Ctrl+Scroll to zoom. Drag background to pan.";
pub const LOCKED_TITLE: &str = "Cards Locked";
pub const LOCKED_MESSAGE: &str = "Cards are locked in position";
pub const LOCK_BUTTON_TITLE: &str = "Lock cards";
pub const UNLOCK_BUTTON_TITLE: &str = "Unlock cards";

/// Easing curve for the canvas transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseOut,
}

impl Easing {
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseOut => "ease-out",
        }
    }
}

/// Transition applied when the canvas transform changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Transition {
    /// Immediate: used while the background is being dragged.
    pub const NONE: Self = Self { duration_ms: 0.0, easing: Easing::Linear };

    #[must_use]
    pub fn eased(duration_ms: f64) -> Self {
        Self { duration_ms, easing: Easing::EaseOut }
    }

    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.duration_ms <= 0.0
    }

    /// CSS `transition` value for the transform property.
    #[must_use]
    pub fn css(&self) -> String {
        if self.is_instant() {
            return "none".to_owned();
        }
        format!("transform {}ms {}", self.duration_ms, self.easing.css())
    }
}

/// Toolbar state.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Controls {
    /// e.g. `"100%"`.
    pub zoom_label: String,
    pub can_zoom_in: bool,
    pub can_zoom_out: bool,
    pub locked: bool,
    /// Tooltip on the lock toggle; names the action a click performs.
    pub lock_title: &'static str,
    pub shuffle_disabled: bool,
    pub reset_disabled: bool,
}

/// Which overlay the host should show on top of the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    /// No goals at all.
    Empty { title: &'static str, message: &'static str },
    /// Shown while goals exist and the canvas is unlocked.
    UsageHint { message: &'static str },
    /// Shown while the canvas is locked.
    Locked { title: &'static str, message: &'static str },
}

impl Overlay {
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty { title: EMPTY_TITLE, message: EMPTY_MESSAGE }
    }

    #[must_use]
    pub fn usage_hint() -> Self {
        Self::UsageHint { message: USAGE_HINT }
    }

    #[must_use]
    pub fn locked() -> Self {
        Self::Locked { title: LOCKED_TITLE, message: LOCKED_MESSAGE }
    }
}

/// One goal card.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: GoalId,
    pub title: String,
    pub category: Category,
    pub category_label: &'static str,
    /// Canvas-local top-left corner.
    pub position: Point,
    pub size: Size,
    /// Rectangle the card's top-left may be dragged within.
    pub constraints: Bounds,
    pub draggable: bool,
    pub current_progress: f64,
    pub target_value: f64,
    /// Rounded completion percentage.
    pub percentage: u32,
    pub completed: bool,
    pub can_decrement: bool,
    pub can_increment: bool,
}

/// A full frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub canvas: Size,
    /// CSS `transform` for the canvas container.
    pub transform: String,
    pub transition: Transition,
    /// Bounds the host may use for its own background drag handling.
    pub pan_bounds: Bounds,
    pub panning: bool,
    pub dark_mode: bool,
    /// CSS `background-image` for the dot grid behind the cards.
    pub background: &'static str,
    pub controls: Controls,
    pub overlays: Vec<Overlay>,
    pub cards: Vec<CardView>,
}

impl Scene {
    /// Card for `id`, if it is part of this frame.
    #[must_use]
    pub fn card(&self, id: &GoalId) -> Option<&CardView> {
        self.cards.iter().find(|c| &c.id == id)
    }
}

/// CSS `background-image` for the dot grid behind the cards.
#[must_use]
pub fn background_pattern(dark_mode: bool) -> &'static str {
    if dark_mode {
        "radial-gradient(circle at 2px 2px, rgba(255,255,255,0.15) 1px, transparent 0)"
    } else {
        "radial-gradient(circle at 2px 2px, rgba(0,0,0,0.1) 1px, transparent 0)"
    }
}
