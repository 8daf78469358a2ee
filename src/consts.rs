//! Shared numeric constants for the floating canvas.

// ── Viewport classes ────────────────────────────────────────────

/// Window widths below this are classified as mobile.
pub const MOBILE_MAX_WIDTH: f64 = 768.0;

/// Window widths below this (and at least [`MOBILE_MAX_WIDTH`]) are tablet.
pub const TABLET_MAX_WIDTH: f64 = 1024.0;

// ── Card presets (CSS pixels) ───────────────────────────────────

pub const MOBILE_CARD_WIDTH: f64 = 240.0;
pub const MOBILE_CARD_HEIGHT: f64 = 280.0;
pub const TABLET_CARD_WIDTH: f64 = 260.0;
pub const TABLET_CARD_HEIGHT: f64 = 300.0;
pub const DESKTOP_CARD_WIDTH: f64 = 288.0;
pub const DESKTOP_CARD_HEIGHT: f64 = 320.0;

// ── Grid ────────────────────────────────────────────────────────

/// Inset between the canvas edge and the outermost card slots.
pub const CANVAS_PADDING: f64 = 100.0;

/// Gap between neighbouring grid slots.
pub const CARD_MARGIN: f64 = 60.0;

/// Smallest canvas width, so a handful of cards still has room to pan.
pub const MIN_CANVAS_WIDTH: f64 = 1200.0;

/// Smallest canvas height.
pub const MIN_CANVAS_HEIGHT: f64 = 800.0;

/// Multiplier applied to the goal count before taking the square root,
/// biasing the grid toward more columns than rows.
pub const COLUMN_BIAS: f64 = 1.2;

/// Fewest columns the grid ever uses.
pub const MIN_COLUMNS: usize = 2;

// ── Zoom / pan ──────────────────────────────────────────────────

pub const ZOOM_MIN: f64 = 0.3;
pub const ZOOM_MAX: f64 = 2.0;
pub const ZOOM_DEFAULT: f64 = 1.0;

/// Zoom change per toolbar button press.
pub const ZOOM_BUTTON_STEP: f64 = 0.2;

/// Zoom change per ctrl+wheel tick.
pub const ZOOM_WHEEL_STEP: f64 = 0.1;

/// Fraction of pointer overshoot applied once a pan passes its bounds.
pub const PAN_ELASTICITY: f64 = 0.02;

/// Eased transform transition used whenever the canvas is not being panned.
pub const TRANSFORM_TRANSITION_MS: f64 = 300.0;

// ── Persistence ─────────────────────────────────────────────────

/// Debounce window for writes fed by card drags.
pub const POSITION_SAVE_DEBOUNCE_MS: f64 = 200.0;

/// Debounce window for the coarser save that follows every map change.
pub const AUTOSAVE_DEBOUNCE_MS: f64 = 500.0;

/// Prefix shared by every key the host app writes to local storage.
pub const STORAGE_NAMESPACE: &str = "goalsetter-";

/// Key (after the namespace) holding the serialized position map.
pub const POSITIONS_KEY: &str = "floating-positions";
