//! Floating canvas container: composes layout, positions, camera, and input.
//!
//! DESIGN
//! ======
//! [`EngineCore`] is the single owner of the position map and the viewport
//! transform. The host feeds it data (goals, window width, viewport size),
//! pointer and wheel events, and toolbar clicks; every handler mutates state
//! synchronously and returns the [`Action`]s the host must carry out. Time is
//! passed in as `now_ms` wherever a change can schedule a save, and the host
//! calls [`EngineCore::tick`] when [`EngineCore::next_due`] comes around.
//!
//! Lock freezes card positions: shuffle, reset, and card drags become no-ops
//! and cards get an all-zero constraint rectangle. Pan and zoom stay live.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures never reach the host. Unreadable saved positions are
//! replaced by grid placement; failed writes are logged and the in-memory
//! map carries on.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use rand::Rng;
use tracing::{debug, error};

use crate::camera::{Bounds, Camera, Point, Size, elastic_pan, pan_bounds};
use crate::config::CanvasConfig;
use crate::error::ErrorCode;
use crate::goal::{Goal, GoalId};
use crate::hit::{card_at, card_position};
use crate::input::{Button, InputState, Modifiers, WheelDelta, drag_step};
use crate::layout::{Constraints, LayoutConstants, ViewportClass, compute_layout};
use crate::positions::{self, PositionMap, PositionStore};
use crate::render::{
    CardView, Controls, LOCK_BUTTON_TITLE, Overlay, Scene, Transition, UNLOCK_BUTTON_TITLE, background_pattern,
};
use crate::storage::Storage;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Open the host's goal editor.
    EditGoal(GoalId),
    /// Ask the host to delete a goal.
    DeleteGoal(GoalId),
    /// Ask the host to store new progress for a goal.
    UpdateProgress { id: GoalId, current_progress: f64 },
    /// The triggering DOM event must have its default behaviour suppressed.
    PreventDefault,
    RenderNeeded,
}

/// Core engine state. Independent of the DOM so it can be tested natively.
pub struct EngineCore<S> {
    config: CanvasConfig,
    store: PositionStore<S>,
    goals: Vec<Goal>,
    positions: PositionMap,
    camera: Camera,
    input: InputState,
    viewport_class: ViewportClass,
    layout: LayoutConstants,
    viewport: Size,
    locked: bool,
    dark_mode: bool,
}

impl<S: Storage> EngineCore<S> {
    /// Create an engine and load any saved positions from `storage`.
    #[must_use]
    pub fn new(storage: S, config: CanvasConfig) -> Self {
        let store = PositionStore::new(storage, &config);
        let positions = store.load();
        let viewport_class = ViewportClass::default();
        Self {
            config,
            store,
            goals: Vec::new(),
            positions,
            camera: Camera::default(),
            input: InputState::default(),
            viewport_class,
            layout: compute_layout(0, viewport_class),
            viewport: Size::default(),
            locked: false,
            dark_mode: false,
        }
    }

    // --- Data inputs ---

    /// Replace the goal list. Goals seen for the first time get their grid slot.
    pub fn set_goals(&mut self, goals: Vec<Goal>, now_ms: f64) -> Vec<Action> {
        self.goals = goals;
        self.relayout();

        let dragged_gone = self
            .input
            .dragged_card()
            .is_some_and(|id| !self.goals.iter().any(|g| &g.id == id));
        if dragged_gone {
            self.input = InputState::Idle;
        }

        if let Some(next) = positions::ensure_positions(&self.positions, &self.goals, &self.layout) {
            debug!(added = next.len() - self.positions.len(), "assigned grid positions to new goals");
            self.replace_positions(next, now_ms);
        }
        self.settle_pan();
        vec![Action::RenderNeeded]
    }

    /// Re-classify the window. Changes card presets and canvas size.
    pub fn set_window_width(&mut self, width: f64) -> Vec<Action> {
        let class = ViewportClass::from_width(width);
        if class == self.viewport_class {
            return Vec::new();
        }
        debug!(?class, width, "viewport class changed");
        self.viewport_class = class;
        self.relayout();
        self.settle_pan();
        vec![Action::RenderNeeded]
    }

    /// Record the measured size of the visible viewport element.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        let size = Size::new(width.max(0.0), height.max(0.0));
        if size == self.viewport {
            return Vec::new();
        }
        self.viewport = size;
        self.settle_pan();
        vec![Action::RenderNeeded]
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) -> Vec<Action> {
        if dark_mode == self.dark_mode {
            return Vec::new();
        }
        self.dark_mode = dark_mode;
        vec![Action::RenderNeeded]
    }

    fn relayout(&mut self) {
        self.layout = compute_layout(self.goals.len(), self.viewport_class);
    }

    // --- Lock ---

    /// Freeze or unfreeze card positions. Locking ends any card drag.
    pub fn set_locked(&mut self, locked: bool) -> Vec<Action> {
        if locked == self.locked {
            return Vec::new();
        }
        self.locked = locked;
        if locked && self.input.dragged_card().is_some() {
            self.input = InputState::Idle;
        }
        debug!(locked, "canvas lock changed");
        vec![Action::RenderNeeded]
    }

    pub fn toggle_lock(&mut self) -> Vec<Action> {
        self.set_locked(!self.locked)
    }

    // --- Layout commands ---

    /// Scatter every card at random inside the constraints.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R, now_ms: f64) -> Vec<Action> {
        if self.locked {
            return Vec::new();
        }
        let next = positions::shuffle(&self.goals, &self.constraints(), rng);
        debug!(count = next.len(), "shuffled cards");
        self.replace_positions(next, now_ms);
        vec![Action::RenderNeeded]
    }

    /// Put every card back in its grid slot.
    pub fn reset_to_grid(&mut self, now_ms: f64) -> Vec<Action> {
        if self.locked {
            return Vec::new();
        }
        let next = positions::reset_to_grid(&self.goals, &self.layout);
        debug!(count = next.len(), "reset cards to grid");
        self.replace_positions(next, now_ms);
        vec![Action::RenderNeeded]
    }

    /// Move one card to `raw`, clamped. Used by pointer drags and by hosts
    /// that run their own drag gesture.
    pub fn set_card_position(&mut self, id: &GoalId, raw: Point, now_ms: f64) -> Vec<Action> {
        if self.locked || self.goal(id).is_none() {
            return Vec::new();
        }
        let next = positions::set_position(&self.positions, id, raw, &self.card_constraints());
        if next == self.positions {
            return Vec::new();
        }
        self.positions = next;
        self.store.persist(&self.positions, now_ms);
        vec![Action::RenderNeeded]
    }

    fn replace_positions(&mut self, next: PositionMap, now_ms: f64) {
        if next == self.positions {
            return;
        }
        self.positions = next;
        self.store.autosave(&self.positions, now_ms);
    }

    // --- Viewport transform ---

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.camera.zoom_in(&self.config.zoom);
        self.settle_pan();
        vec![Action::RenderNeeded]
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.camera.zoom_out(&self.config.zoom);
        self.settle_pan();
        vec![Action::RenderNeeded]
    }

    /// Zoom back to 100% and centre the canvas.
    pub fn reset_view(&mut self) -> Vec<Action> {
        self.camera.reset_view();
        if self.input.is_panning() {
            self.input = InputState::Idle;
        }
        vec![Action::RenderNeeded]
    }

    // --- Input events ---

    /// Ctrl+wheel zooms and must not scroll the page. Plain wheel is left
    /// to the browser.
    pub fn on_wheel(&mut self, _screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if !modifiers.ctrl {
            return Vec::new();
        }
        self.camera.zoom_by_wheel(delta.dy, &self.config.zoom);
        self.settle_pan();
        vec![Action::PreventDefault, Action::RenderNeeded]
    }

    /// Start a card drag on an unlocked card, otherwise a background pan.
    /// A gesture whose pointer-up never arrived is ended first.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let mut actions = self.end_gesture();
        let hit = card_at(screen_pt, &self.goals, &self.positions, &self.camera, &self.layout);
        let started = match hit {
            Some(id) if !self.locked => self.begin_card_drag(id, screen_pt),
            _ => self.begin_pan(screen_pt),
        };
        actions.extend(started);
        actions.dedup();
        actions
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers, now_ms: f64) -> Vec<Action> {
        match self.input.clone() {
            InputState::Idle => Vec::new(),
            InputState::Panning { start_screen, start_pan } => {
                let raw = start_pan.offset(screen_pt.delta_from(start_screen));
                let pan = elastic_pan(raw, &self.pan_bounds(), self.config.pan_elasticity);
                self.camera.set_pan(pan);
                vec![Action::RenderNeeded]
            }
            InputState::DraggingCard { id, last_screen } => {
                self.input = InputState::DraggingCard { id: id.clone(), last_screen: screen_pt };
                let current = card_position(&self.positions, &id);
                let delta = screen_pt.delta_from(last_screen);
                let next = drag_step(current, delta, self.camera.zoom, &self.card_constraints());
                self.set_card_position(&id, next, now_ms)
            }
        }
    }

    /// End the gesture. A pan snaps back inside its bounds.
    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.end_gesture()
    }

    /// The browser took the pointer away (`pointercancel`, lost capture).
    /// Ends the gesture like a pointer-up; a dragged card keeps its last position.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.end_gesture()
    }

    fn end_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::DraggingCard { .. } => Vec::new(),
            InputState::Panning { .. } => {
                self.settle_pan();
                vec![Action::RenderNeeded]
            }
        }
    }

    /// Pull the pan offset back inside its bounds. No-op while panning; the
    /// pan settles on release.
    fn settle_pan(&mut self) {
        if self.input.is_panning() {
            return;
        }
        let settled = self.pan_bounds().clamp(self.camera.pan());
        self.camera.set_pan(settled);
    }

    /// Begin dragging `id`. No-op while locked or for unknown goals.
    pub fn begin_card_drag(&mut self, id: GoalId, screen_pt: Point) -> Vec<Action> {
        if self.locked || !self.goals.iter().any(|g| g.id == id) {
            return Vec::new();
        }
        self.input = InputState::DraggingCard { id, last_screen: screen_pt };
        Vec::new()
    }

    /// Begin dragging the background.
    pub fn begin_pan(&mut self, screen_pt: Point) -> Vec<Action> {
        self.input = InputState::Panning { start_screen: screen_pt, start_pan: self.camera.pan() };
        vec![Action::RenderNeeded]
    }

    // --- Card affordances ---

    pub fn edit_goal(&self, id: &GoalId) -> Vec<Action> {
        match self.goal(id) {
            Some(goal) => vec![Action::EditGoal(goal.id.clone())],
            None => Vec::new(),
        }
    }

    pub fn delete_goal(&self, id: &GoalId) -> Vec<Action> {
        match self.goal(id) {
            Some(goal) => vec![Action::DeleteGoal(goal.id.clone())],
            None => Vec::new(),
        }
    }

    /// Step a goal's progress by `increment`, kept within `[0, target]`.
    /// Nothing is emitted when the step would not change the value.
    pub fn step_progress(&self, id: &GoalId, increment: f64) -> Vec<Action> {
        let Some(goal) = self.goal(id) else {
            return Vec::new();
        };
        let next = goal.stepped_progress(increment);
        if (next - goal.current_progress).abs() < f64::EPSILON {
            return Vec::new();
        }
        vec![Action::UpdateProgress { id: goal.id.clone(), current_progress: next }]
    }

    // --- Persistence driving ---

    /// Write any save that has come due. Returns whether storage was written.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.store.tick(now_ms) {
            Ok(written) => written,
            Err(e) => {
                error!(error = %e, code = e.error_code(), key = self.store.key(), "failed to save positions");
                false
            }
        }
    }

    /// Write the newest pending save immediately.
    pub fn flush(&mut self) -> bool {
        match self.store.flush() {
            Ok(written) => written,
            Err(e) => {
                error!(error = %e, code = e.error_code(), key = self.store.key(), "failed to flush positions");
                false
            }
        }
    }

    /// Deadline of the next pending save, if any.
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        self.store.next_due()
    }

    /// Teardown: drop pending saves and any gesture in progress.
    pub fn shutdown(&mut self) {
        let dropped = self.store.cancel();
        self.input = InputState::Idle;
        debug!(dropped, "canvas shut down");
    }

    // --- Geometry ---

    /// Card placement rectangle. All-zero until the viewport has been measured.
    #[must_use]
    pub fn constraints(&self) -> Constraints {
        if self.viewport.is_empty() {
            return Bounds::ZERO;
        }
        self.layout.constraints()
    }

    /// Constraints handed to cards: all-zero while locked.
    #[must_use]
    pub fn card_constraints(&self) -> Constraints {
        if self.locked {
            return Bounds::ZERO;
        }
        self.constraints()
    }

    /// Allowed pan offsets for the current zoom and viewport.
    #[must_use]
    pub fn pan_bounds(&self) -> Bounds {
        pan_bounds(self.layout.canvas_size(), self.viewport, self.camera.zoom)
    }

    // --- Render ---

    /// Snapshot of everything needed to draw the current frame.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let panning = self.input.is_panning();
        let transition = if panning { Transition::NONE } else { Transition::eased(self.config.transition_ms) };

        let controls = Controls {
            zoom_label: format!("{}%", self.camera.zoom_percent()),
            can_zoom_in: self.camera.zoom < self.config.zoom.max,
            can_zoom_out: self.camera.zoom > self.config.zoom.min,
            locked: self.locked,
            lock_title: if self.locked { UNLOCK_BUTTON_TITLE } else { LOCK_BUTTON_TITLE },
            shuffle_disabled: self.locked,
            reset_disabled: self.locked,
        };

        let mut overlays = Vec::new();
        if self.goals.is_empty() {
            overlays.push(Overlay::empty());
        } else if !self.locked {
            overlays.push(Overlay::usage_hint());
        }
        if self.locked {
            overlays.push(Overlay::locked());
        }

        let constraints = self.card_constraints();
        let cards = self.goals.iter().map(|goal| self.card_view(goal, constraints)).collect();

        Scene {
            canvas: self.layout.canvas_size(),
            transform: self.camera.css_transform(),
            transition,
            pan_bounds: self.pan_bounds(),
            panning,
            dark_mode: self.dark_mode,
            background: background_pattern(self.dark_mode),
            controls,
            overlays,
            cards,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn card_view(&self, goal: &Goal, constraints: Constraints) -> CardView {
        CardView {
            id: goal.id.clone(),
            title: goal.title.clone(),
            category: goal.category,
            category_label: goal.category.label(),
            position: card_position(&self.positions, &goal.id),
            size: self.layout.card_size(),
            constraints,
            draggable: !self.locked,
            current_progress: goal.current_progress,
            target_value: goal.target_value,
            percentage: goal.percentage().round() as u32,
            completed: goal.is_completed(),
            can_decrement: goal.can_decrement(),
            can_increment: goal.can_increment(),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn goal(&self, id: &GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| &g.id == id)
    }

    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    #[must_use]
    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    #[must_use]
    pub fn position(&self, id: &GoalId) -> Option<Point> {
        self.positions.get(id).copied()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutConstants {
        &self.layout
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn viewport_class(&self) -> ViewportClass {
        self.viewport_class
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        self.store.storage()
    }
}
