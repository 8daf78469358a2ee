//! Browser bindings, compiled with the `web` feature.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`EngineCore`] never touches the DOM. This module supplies the browser
//! half: a `localStorage` adapter for [`Storage`], a `gloo-timers` driver
//! that calls [`EngineCore::tick`] when a debounced save comes due, and a
//! `ResizeObserver` wrapper that feeds viewport measurements back in.
//! [`Engine`] ties them together for a host component.
//!
//! Teardown happens on drop: pending saves are cancelled, the timer is
//! cleared, and the observer is disconnected.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use js_sys::{Array, Date, Math};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, ResizeObserver};

use crate::camera::Point;
use crate::config::CanvasConfig;
use crate::engine::{Action, EngineCore};
use crate::goal::{Goal, GoalId};
use crate::input::{Button, Modifiers, WheelDelta};
use crate::render::Scene;
use crate::storage::{Storage, StorageError};

/// Milliseconds since the epoch from the browser clock.
#[must_use]
pub fn now_ms() -> f64 {
    Date::now()
}

/// Current `window.innerWidth`, if a window exists.
#[must_use]
pub fn window_width() -> Option<f64> {
    let window = web_sys::window()?;
    match window.inner_width() {
        Ok(width) => width.as_f64(),
        Err(_) => None,
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

// =============================================================================
// STORAGE
// =============================================================================

/// [`Storage`] backed by `window.localStorage`.
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// Open the window's local storage.
    pub fn from_window() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        match window.local_storage() {
            Ok(Some(inner)) => Ok(Self { inner }),
            Ok(None) => Err(StorageError::Unavailable),
            Err(e) => Err(StorageError::Backend(describe(&e))),
        }
    }
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::Backend(describe(&e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(describe(&e)))
    }
}

// =============================================================================
// SAVE TIMER
// =============================================================================

pub type SharedEngine = Rc<RefCell<EngineCore<LocalStorage>>>;

/// One-shot timer kept aligned with the engine's next save deadline.
#[derive(Clone, Default)]
pub struct SaveTimer {
    slot: Rc<RefCell<Option<Timeout>>>,
}

impl SaveTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-arm for the engine's next deadline, or clear if nothing is pending.
    pub fn arm(&self, engine: &SharedEngine) {
        let Ok(next_due) = engine.try_borrow().map(|core| core.next_due()) else {
            return;
        };
        let Some(due) = next_due else {
            self.cancel();
            return;
        };
        let delay = delay_until(due);
        let engine_for_cb = Rc::clone(engine);
        let timer = self.clone();
        let timeout = Timeout::new(delay, move || {
            let Ok(mut core) = engine_for_cb.try_borrow_mut() else {
                // The borrow holder re-arms when it finishes.
                warn!("engine busy when save timer fired");
                return;
            };
            core.tick(now_ms());
            drop(core);
            timer.arm(&engine_for_cb);
        });
        *self.slot.borrow_mut() = Some(timeout);
    }

    /// Clear any armed timeout.
    pub fn cancel(&self) {
        if let Some(timeout) = self.slot.borrow_mut().take() {
            timeout.cancel();
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn delay_until(due_ms: f64) -> u32 {
    (due_ms - now_ms()).max(0.0).ceil().min(f64::from(u32::MAX)) as u32
}

// =============================================================================
// VIEWPORT OBSERVER
// =============================================================================

/// `ResizeObserver` on the viewport element. Disconnects on drop.
pub struct ViewportObserver {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut(Array)>,
}

impl ViewportObserver {
    /// Call `on_resize(width, height)` with the element's bounding box
    /// whenever it changes. Measures the same way as [`Engine::mount`].
    pub fn observe<F>(element: &Element, mut on_resize: F) -> Result<Self, JsValue>
    where
        F: FnMut(f64, f64) + 'static,
    {
        let target = element.clone();
        let callback = Closure::<dyn FnMut(Array)>::new(move |_entries: Array| {
            let rect = target.get_bounding_client_rect();
            on_resize(rect.width(), rect.height());
        });
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(element);
        Ok(Self { observer, _callback: callback })
    }
}

impl Drop for ViewportObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// The floating canvas bound to a viewport element and `localStorage`.
///
/// Every delegated call re-arms the save timer. Actions are returned to the
/// host unchanged; `PreventDefault` must be applied to the DOM event that
/// produced it.
pub struct Engine {
    core: SharedEngine,
    timer: SaveTimer,
    rng: StdRng,
    _observer: ViewportObserver,
}

impl Engine {
    /// Mount on `viewport`. `on_resize` runs after each viewport measurement
    /// so the host can re-render.
    pub fn mount<F>(viewport: &Element, config: CanvasConfig, mut on_resize: F) -> Result<Self, JsValue>
    where
        F: FnMut() + 'static,
    {
        let storage = LocalStorage::from_window().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let core: SharedEngine = Rc::new(RefCell::new(EngineCore::new(storage, config)));

        {
            let mut c = core.borrow_mut();
            if let Some(width) = window_width() {
                c.set_window_width(width);
            }
            let rect = viewport.get_bounding_client_rect();
            c.set_viewport(rect.width(), rect.height());
        }

        let core_for_cb = Rc::clone(&core);
        let observer = ViewportObserver::observe(viewport, move |width, height| {
            let Ok(mut c) = core_for_cb.try_borrow_mut() else {
                return;
            };
            let mut actions = c.set_viewport(width, height);
            if let Some(window_w) = window_width() {
                actions.extend(c.set_window_width(window_w));
            }
            drop(c);
            if actions.contains(&Action::RenderNeeded) {
                on_resize();
            }
        })?;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let seed = (Math::random() * u64::MAX as f64) as u64;
        debug!("floating canvas mounted");

        Ok(Self { core, timer: SaveTimer::new(), rng: StdRng::seed_from_u64(seed), _observer: observer })
    }

    fn with_core<T>(&mut self, f: impl FnOnce(&mut EngineCore<LocalStorage>, &mut StdRng) -> T) -> T {
        let result = f(&mut self.core.borrow_mut(), &mut self.rng);
        self.timer.arm(&self.core);
        result
    }

    // --- Data inputs ---

    pub fn set_goals(&mut self, goals: Vec<Goal>) -> Vec<Action> {
        self.with_core(|c, _| c.set_goals(goals, now_ms()))
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) -> Vec<Action> {
        self.with_core(|c, _| c.set_dark_mode(dark_mode))
    }

    // --- Toolbar ---

    pub fn toggle_lock(&mut self) -> Vec<Action> {
        self.with_core(|c, _| c.toggle_lock())
    }

    pub fn shuffle(&mut self) -> Vec<Action> {
        self.with_core(|c, rng| c.shuffle(rng, now_ms()))
    }

    pub fn reset_to_grid(&mut self) -> Vec<Action> {
        self.with_core(|c, _| c.reset_to_grid(now_ms()))
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.with_core(|c, _| c.zoom_in())
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.with_core(|c, _| c.zoom_out())
    }

    pub fn reset_view(&mut self) -> Vec<Action> {
        self.with_core(|c, _| c.reset_view())
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.with_core(|c, _| c.on_pointer_down(screen_pt, button, modifiers))
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.with_core(|c, _| c.on_pointer_move(screen_pt, modifiers, now_ms()))
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.with_core(|c, _| c.on_pointer_up(screen_pt, button, modifiers))
    }

    /// Wire to `pointercancel` and `lostpointercapture`.
    pub fn on_pointer_cancel(&mut self) -> Vec<Action> {
        self.with_core(|c, _| c.on_pointer_cancel())
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.with_core(|c, _| c.on_wheel(screen_pt, delta, modifiers))
    }

    // --- Card affordances ---

    #[must_use]
    pub fn edit_goal(&self, id: &GoalId) -> Vec<Action> {
        self.core.borrow().edit_goal(id)
    }

    #[must_use]
    pub fn delete_goal(&self, id: &GoalId) -> Vec<Action> {
        self.core.borrow().delete_goal(id)
    }

    #[must_use]
    pub fn step_progress(&self, id: &GoalId, increment: f64) -> Vec<Action> {
        self.core.borrow().step_progress(id, increment)
    }

    // --- Render ---

    #[must_use]
    pub fn scene(&self) -> Scene {
        self.core.borrow().scene()
    }

    /// Scene as a JSON string for the JavaScript side.
    pub fn scene_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.scene())
    }

    /// Write pending saves now, e.g. from a `pagehide` handler.
    pub fn flush(&mut self) -> bool {
        let written = self.core.borrow_mut().flush();
        self.timer.cancel();
        written
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.timer.cancel();
        if let Ok(mut core) = self.core.try_borrow_mut() {
            core.shutdown();
        }
    }
}
