//! Position store: the goal id → canvas-local position map and its
//! persistence.
//!
//! DESIGN
//! ======
//! The map itself is a plain value. Every mutation is a pure function that
//! returns a new map, so the container can compare before/after and skip
//! redundant renders and writes. [`PositionStore`] owns the storage handle
//! and two debounced save paths:
//!
//! - `persist`: 200 ms, fed by card drags.
//! - `autosave`: 500 ms, fed by every map change (drags included), skipped
//!   while empty.
//!
//! Both carry a sequence number; a due snapshot older than the last one
//! written is dropped, so the two paths never write stale data or write the
//! same map twice.
//!
//! ERROR HANDLING
//! ==============
//! Unreadable saved state is logged and treated as an empty map, which makes
//! the container fall back to grid placement. Failed writes are returned to
//! the caller, which logs them; in-memory positions are unaffected.

#[cfg(test)]
#[path = "positions_test.rs"]
mod positions_test;

use std::collections::BTreeMap;

use rand::Rng;
use tracing::{debug, warn};

use crate::camera::Point;
use crate::config::CanvasConfig;
use crate::debounce::Debouncer;
use crate::error::CanvasError;
use crate::goal::{Goal, GoalId};
use crate::layout::{Constraints, LayoutConstants};
use crate::storage::Storage;

/// Canvas-local top-left corner of a card.
pub type Position = Point;

/// Goal id → position. Stale ids for removed goals are kept.
pub type PositionMap = BTreeMap<GoalId, Position>;

// =============================================================================
// PURE OPERATIONS
// =============================================================================

/// Give every goal without a position its grid slot, keyed by the goal's
/// index in `goals`. Returns `None` when every goal already has a position.
#[must_use]
pub fn ensure_positions(map: &PositionMap, goals: &[Goal], layout: &LayoutConstants) -> Option<PositionMap> {
    if goals.iter().all(|g| map.contains_key(&g.id)) {
        return None;
    }
    let mut next = map.clone();
    for (index, goal) in goals.iter().enumerate() {
        next.entry(goal.id.clone())
            .or_insert_with(|| layout.grid_position(index));
    }
    Some(next)
}

/// Replace one entry with `raw` clamped into `constraints`.
#[must_use]
pub fn set_position(map: &PositionMap, id: &GoalId, raw: Position, constraints: &Constraints) -> PositionMap {
    let mut next = map.clone();
    next.insert(id.clone(), constraints.clamp(raw));
    next
}

/// Scatter every goal uniformly at random inside `constraints`.
///
/// Cards may overlap. Ids not in `goals` are not carried over.
#[must_use]
pub fn shuffle<R: Rng + ?Sized>(goals: &[Goal], constraints: &Constraints, rng: &mut R) -> PositionMap {
    goals
        .iter()
        .map(|goal| {
            let x = random_between(rng, constraints.left, constraints.right);
            let y = random_between(rng, constraints.top, constraints.bottom);
            (goal.id.clone(), Point::new(x, y))
        })
        .collect()
}

/// Put every goal back in its grid slot. Ids not in `goals` are not carried over.
#[must_use]
pub fn reset_to_grid(goals: &[Goal], layout: &LayoutConstants) -> PositionMap {
    goals
        .iter()
        .enumerate()
        .map(|(index, goal)| (goal.id.clone(), layout.grid_position(index)))
        .collect()
}

fn random_between<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low { rng.random_range(low..high) } else { low }
}

// =============================================================================
// PERSISTENCE
// =============================================================================

#[derive(Debug, Clone)]
struct Snapshot {
    seq: u64,
    map: PositionMap,
}

/// Storage-backed, debounced writer for the position map.
pub struct PositionStore<S> {
    storage: S,
    key: String,
    save: Debouncer<Snapshot>,
    autosave: Debouncer<Snapshot>,
    next_seq: u64,
    written_seq: u64,
}

impl<S: Storage> PositionStore<S> {
    #[must_use]
    pub fn new(storage: S, config: &CanvasConfig) -> Self {
        Self {
            storage,
            key: config.storage_key(),
            save: Debouncer::new(config.position_debounce_ms),
            autosave: Debouncer::new(config.autosave_debounce_ms),
            next_seq: 0,
            written_seq: 0,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the saved map. Absent data is an empty map, not an error.
    pub fn try_load(&self) -> Result<PositionMap, CanvasError> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(PositionMap::new());
        };
        serde_json::from_str(&raw).map_err(CanvasError::Parse)
    }

    /// Read the saved map, logging and discarding anything unreadable.
    #[must_use]
    pub fn load(&self) -> PositionMap {
        match self.try_load() {
            Ok(map) => {
                debug!(key = %self.key, count = map.len(), "loaded saved positions");
                map
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "ignoring unreadable saved positions");
                PositionMap::new()
            }
        }
    }

    /// Schedule a write on the drag path. The same snapshot also feeds the
    /// coarse path, which then never writes it a second time.
    pub fn persist(&mut self, map: &PositionMap, now_ms: f64) {
        let snapshot = self.snapshot(map);
        self.autosave.schedule(snapshot.clone(), now_ms);
        self.save.schedule(snapshot, now_ms);
    }

    /// Schedule a write on the coarse path. Empty maps are never autosaved.
    pub fn autosave(&mut self, map: &PositionMap, now_ms: f64) {
        if map.is_empty() {
            return;
        }
        let snapshot = self.snapshot(map);
        self.autosave.schedule(snapshot, now_ms);
    }

    /// Write whatever has come due by `now_ms`. Returns whether a write happened.
    pub fn tick(&mut self, now_ms: f64) -> Result<bool, CanvasError> {
        let due = newest(self.save.poll(now_ms), self.autosave.poll(now_ms));
        self.write_snapshot(due)
    }

    /// Write the newest pending snapshot immediately.
    pub fn flush(&mut self) -> Result<bool, CanvasError> {
        let pending = newest(self.save.flush(), self.autosave.flush());
        self.write_snapshot(pending)
    }

    /// Drop all pending writes. Returns whether anything was pending.
    pub fn cancel(&mut self) -> bool {
        let save = self.save.cancel();
        let autosave = self.autosave.cancel();
        save || autosave
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.save.is_pending() || self.autosave.is_pending()
    }

    /// Earliest deadline across both save paths.
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        match (self.save.due_at(), self.autosave.due_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Serialize and write `map` right away, bypassing both debouncers.
    pub fn write_now(&mut self, map: &PositionMap) -> Result<(), CanvasError> {
        let raw = serde_json::to_string(map).map_err(CanvasError::Serialize)?;
        self.storage.set_item(&self.key, &raw)?;
        Ok(())
    }

    fn snapshot(&mut self, map: &PositionMap) -> Snapshot {
        self.next_seq += 1;
        Snapshot { seq: self.next_seq, map: map.clone() }
    }

    fn write_snapshot(&mut self, snapshot: Option<Snapshot>) -> Result<bool, CanvasError> {
        let Some(snapshot) = snapshot else {
            return Ok(false);
        };
        if snapshot.seq <= self.written_seq {
            return Ok(false);
        }
        self.write_now(&snapshot.map)?;
        self.written_seq = snapshot.seq;
        debug!(key = %self.key, count = snapshot.map.len(), "saved positions");
        Ok(true)
    }
}

fn newest(a: Option<Snapshot>, b: Option<Snapshot>) -> Option<Snapshot> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if a.seq >= b.seq { a } else { b }),
        (a, b) => a.or(b),
    }
}
