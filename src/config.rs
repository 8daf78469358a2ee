//! Canvas configuration with defaults, environment overrides, and JSON input.
//!
//! Native hosts read `FLOATING_CANVAS_*` variables; the browser host passes a
//! JSON object. Every field is optional in both forms and falls back to the
//! values in [`crate::consts`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::camera::ZoomPolicy;
use crate::consts::*;
use crate::error::{CanvasError, ConfigError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Prefix shared with the host app's other storage keys.
    pub storage_namespace: String,
    /// Key (after the namespace) holding the position map.
    pub positions_key: String,
    /// Debounce for saves fed by card drags.
    pub position_debounce_ms: f64,
    /// Debounce for the save that follows every position map change.
    pub autosave_debounce_ms: f64,
    pub zoom: ZoomPolicy,
    /// Fraction of pointer overshoot kept when panning past the bounds.
    pub pan_elasticity: f64,
    /// Eased transform transition when not panning.
    pub transition_ms: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            storage_namespace: STORAGE_NAMESPACE.to_owned(),
            positions_key: POSITIONS_KEY.to_owned(),
            position_debounce_ms: POSITION_SAVE_DEBOUNCE_MS,
            autosave_debounce_ms: AUTOSAVE_DEBOUNCE_MS,
            zoom: ZoomPolicy::default(),
            pan_elasticity: PAN_ELASTICITY,
            transition_ms: TRANSFORM_TRANSITION_MS,
        }
    }
}

impl CanvasConfig {
    /// Full storage key for the position map, e.g. `goalsetter-floating-positions`.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("{}{}", self.storage_namespace, self.positions_key)
    }

    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `FLOATING_CANVAS_STORAGE_NAMESPACE`: default `goalsetter-`
    /// - `FLOATING_CANVAS_POSITIONS_KEY`: default `floating-positions`
    /// - `FLOATING_CANVAS_POSITION_DEBOUNCE_MS`: default 200
    /// - `FLOATING_CANVAS_AUTOSAVE_DEBOUNCE_MS`: default 500
    /// - `FLOATING_CANVAS_ZOOM_MIN` / `FLOATING_CANVAS_ZOOM_MAX`: default 0.3 / 2.0
    /// - `FLOATING_CANVAS_ZOOM_BUTTON_STEP`: default 0.2
    /// - `FLOATING_CANVAS_ZOOM_WHEEL_STEP`: default 0.1
    /// - `FLOATING_CANVAS_PAN_ELASTICITY`: default 0.02
    /// - `FLOATING_CANVAS_TRANSITION_MS`: default 300
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reading from an arbitrary lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let number = |key: &str, default: f64| -> Result<f64, ConfigError> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidNumber { var: key.to_owned(), value: raw }),
            }
        };

        let config = Self {
            storage_namespace: lookup("FLOATING_CANVAS_STORAGE_NAMESPACE").unwrap_or(defaults.storage_namespace),
            positions_key: lookup("FLOATING_CANVAS_POSITIONS_KEY").unwrap_or(defaults.positions_key),
            position_debounce_ms: number("FLOATING_CANVAS_POSITION_DEBOUNCE_MS", defaults.position_debounce_ms)?,
            autosave_debounce_ms: number("FLOATING_CANVAS_AUTOSAVE_DEBOUNCE_MS", defaults.autosave_debounce_ms)?,
            zoom: ZoomPolicy {
                min: number("FLOATING_CANVAS_ZOOM_MIN", defaults.zoom.min)?,
                max: number("FLOATING_CANVAS_ZOOM_MAX", defaults.zoom.max)?,
                button_step: number("FLOATING_CANVAS_ZOOM_BUTTON_STEP", defaults.zoom.button_step)?,
                wheel_step: number("FLOATING_CANVAS_ZOOM_WHEEL_STEP", defaults.zoom.wheel_step)?,
            },
            pan_elasticity: number("FLOATING_CANVAS_PAN_ELASTICITY", defaults.pan_elasticity)?,
            transition_ms: number("FLOATING_CANVAS_TRANSITION_MS", defaults.transition_ms)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a (possibly partial) JSON config object.
    pub fn from_json(raw: &str) -> Result<Self, CanvasError> {
        let config: Self = serde_json::from_str(raw).map_err(CanvasError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.positions_key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }
        for (field, value) in [
            ("zoom.min", self.zoom.min),
            ("zoom.max", self.zoom.max),
            ("zoom.button_step", self.zoom.button_step),
            ("zoom.wheel_step", self.zoom.wheel_step),
            ("position_debounce_ms", self.position_debounce_ms),
            ("autosave_debounce_ms", self.autosave_debounce_ms),
            ("pan_elasticity", self.pan_elasticity),
            ("transition_ms", self.transition_ms),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }
        if self.zoom.min <= 0.0 {
            return Err(ConfigError::NotPositive { field: "zoom.min", value: self.zoom.min });
        }
        if self.zoom.min > self.zoom.max {
            return Err(ConfigError::ZoomRange { min: self.zoom.min, max: self.zoom.max });
        }
        if self.zoom.button_step <= 0.0 {
            return Err(ConfigError::NotPositive { field: "zoom.button_step", value: self.zoom.button_step });
        }
        if self.zoom.wheel_step <= 0.0 {
            return Err(ConfigError::NotPositive { field: "zoom.wheel_step", value: self.zoom.wheel_step });
        }
        for (field, value) in [
            ("position_debounce_ms", self.position_debounce_ms),
            ("autosave_debounce_ms", self.autosave_debounce_ms),
            ("pan_elasticity", self.pan_elasticity),
            ("transition_ms", self.transition_ms),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }
}
