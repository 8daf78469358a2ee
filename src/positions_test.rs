#![allow(clippy::float_cmp)]

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::camera::Bounds;
use crate::goal::Category;
use crate::layout::{ViewportClass, compute_layout};
use crate::storage::MemoryStorage;

// =============================================================
// Helpers
// =============================================================

const KEY: &str = "goalsetter-floating-positions";

fn make_goal(id: &str) -> Goal {
    Goal {
        id: GoalId::new(id),
        title: format!("goal {id}"),
        category: Category::Personal,
        current_progress: 0.0,
        target_value: 10.0,
        created_at: String::new(),
    }
}

fn goals(ids: &[&str]) -> Vec<Goal> {
    ids.iter().map(|id| make_goal(id)).collect()
}

fn store() -> PositionStore<MemoryStorage> {
    PositionStore::new(MemoryStorage::new(), &CanvasConfig::default())
}

fn store_with(raw: &str) -> PositionStore<MemoryStorage> {
    PositionStore::new(MemoryStorage::with_item(KEY, raw), &CanvasConfig::default())
}

fn one_entry(id: &str, x: f64, y: f64) -> PositionMap {
    let mut map = PositionMap::new();
    map.insert(GoalId::new(id), Point::new(x, y));
    map
}

// =============================================================
// ensure_positions
// =============================================================

#[test]
fn ensure_assigns_grid_slots_for_three_goals() {
    let list = goals(&["a", "b", "c"]);
    let layout = compute_layout(list.len(), ViewportClass::Desktop);
    assert_eq!(layout.columns, 2);

    let map = ensure_positions(&PositionMap::new(), &list, &layout).unwrap();
    let pad = layout.padding;
    let step_x = layout.card_width + layout.margin;
    let step_y = layout.card_height + layout.margin;
    assert_eq!(map[&GoalId::new("a")], Point::new(pad, pad));
    assert_eq!(map[&GoalId::new("b")], Point::new(pad + step_x, pad));
    assert_eq!(map[&GoalId::new("c")], Point::new(pad, pad + step_y));
}

#[test]
fn ensure_is_idempotent() {
    let list = goals(&["a", "b", "c", "d"]);
    let layout = compute_layout(list.len(), ViewportClass::Tablet);
    let first = ensure_positions(&PositionMap::new(), &list, &layout).unwrap();
    assert!(ensure_positions(&first, &list, &layout).is_none());
}

#[test]
fn ensure_keeps_existing_positions() {
    let list = goals(&["a", "b"]);
    let layout = compute_layout(list.len(), ViewportClass::Desktop);
    let existing = one_entry("a", 555.0, 444.0);

    let map = ensure_positions(&existing, &list, &layout).unwrap();
    assert_eq!(map[&GoalId::new("a")], Point::new(555.0, 444.0));
    assert_eq!(map[&GoalId::new("b")], layout.grid_position(1));
}

#[test]
fn ensure_uses_index_in_goal_list() {
    let list = goals(&["a", "b", "c", "d", "e"]);
    let layout = compute_layout(list.len(), ViewportClass::Desktop);
    let mut existing = PositionMap::new();
    for g in &list[..4] {
        existing.insert(g.id.clone(), Point::new(1.0, 1.0));
    }

    let map = ensure_positions(&existing, &list, &layout).unwrap();
    assert_eq!(map[&GoalId::new("e")], layout.grid_position(4));
}

#[test]
fn ensure_keeps_stale_entries() {
    let list = goals(&["a"]);
    let layout = compute_layout(1, ViewportClass::Desktop);
    let existing = one_entry("deleted", 10.0, 20.0);

    let map = ensure_positions(&existing, &list, &layout).unwrap();
    assert_eq!(map.len(), 2);
    assert!(map.contains_key(&GoalId::new("deleted")));
}

#[test]
fn ensure_with_no_goals_changes_nothing() {
    let layout = compute_layout(0, ViewportClass::Desktop);
    assert!(ensure_positions(&PositionMap::new(), &[], &layout).is_none());
}

// =============================================================
// set_position
// =============================================================

#[test]
fn set_position_clamps_both_axes() {
    let c = Bounds::new(100.0, 812.0, 100.0, 380.0);
    let id = GoalId::new("a");
    let map = set_position(&PositionMap::new(), &id, Point::new(-20.0, 9_999.0), &c);
    assert_eq!(map[&id], Point::new(100.0, 380.0));
}

#[test]
fn set_position_replaces_only_one_entry() {
    let c = Bounds::new(0.0, 1_000.0, 0.0, 1_000.0);
    let mut before = one_entry("a", 1.0, 1.0);
    before.insert(GoalId::new("b"), Point::new(2.0, 2.0));

    let after = set_position(&before, &GoalId::new("a"), Point::new(50.0, 60.0), &c);
    assert_eq!(after[&GoalId::new("a")], Point::new(50.0, 60.0));
    assert_eq!(after[&GoalId::new("b")], Point::new(2.0, 2.0));
    assert_eq!(before[&GoalId::new("a")], Point::new(1.0, 1.0));
}

#[test]
fn set_position_in_zero_rect_pins_to_origin() {
    let id = GoalId::new("a");
    let map = set_position(&PositionMap::new(), &id, Point::new(300.0, 300.0), &Bounds::ZERO);
    assert_eq!(map[&id], Point::new(0.0, 0.0));
}

// =============================================================
// shuffle / reset_to_grid
// =============================================================

#[test]
fn shuffle_stays_within_constraints() {
    let list = goals(&["a", "b", "c", "d", "e", "f", "g"]);
    let layout = compute_layout(list.len(), ViewportClass::Desktop);
    let c = layout.constraints();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..20 {
        let map = shuffle(&list, &c, &mut rng);
        assert_eq!(map.len(), list.len());
        for p in map.values() {
            assert!(c.contains(*p), "{p:?} outside {c:?}");
        }
    }
}

#[test]
fn shuffle_is_reproducible_with_same_seed() {
    let list = goals(&["a", "b", "c"]);
    let c = compute_layout(3, ViewportClass::Desktop).constraints();
    let a = shuffle(&list, &c, &mut StdRng::seed_from_u64(42));
    let b = shuffle(&list, &c, &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn shuffle_with_degenerate_constraints_uses_lower_edge() {
    let list = goals(&["a"]);
    let map = shuffle(&list, &Bounds::ZERO, &mut StdRng::seed_from_u64(1));
    assert_eq!(map[&GoalId::new("a")], Point::new(0.0, 0.0));
}

#[test]
fn reset_to_grid_overrides_manual_positions() {
    let list = goals(&["a", "b", "c"]);
    let layout = compute_layout(list.len(), ViewportClass::Desktop);
    let map = reset_to_grid(&list, &layout);
    for (index, goal) in list.iter().enumerate() {
        assert_eq!(map[&goal.id], layout.grid_position(index));
    }
}

#[test]
fn reset_to_grid_matches_fresh_ensure() {
    let list = goals(&["a", "b", "c", "d"]);
    let layout = compute_layout(list.len(), ViewportClass::Mobile);
    let ensured = ensure_positions(&PositionMap::new(), &list, &layout).unwrap();
    assert_eq!(reset_to_grid(&list, &layout), ensured);
}

// =============================================================
// PositionStore: load
// =============================================================

#[test]
fn load_absent_is_empty() {
    assert!(store().load().is_empty());
}

#[test]
fn load_corrupt_json_is_empty() {
    let s = store_with("{not json");
    assert!(s.load().is_empty());
    assert!(matches!(s.try_load(), Err(CanvasError::Parse(_))));
}

#[test]
fn load_wrong_shape_is_empty() {
    assert!(store_with(r#"{"a": "top-left"}"#).load().is_empty());
    assert!(store_with("[]").load().is_empty());
}

#[test]
fn load_reads_saved_positions() {
    let s = store_with(r#"{"1": {"x": 100, "y": 100}, "abc": {"x": 448.5, "y": 480}}"#);
    let map = s.load();
    assert_eq!(map[&GoalId::new("1")], Point::new(100.0, 100.0));
    assert_eq!(map[&GoalId::new("abc")], Point::new(448.5, 480.0));
}

#[test]
fn store_uses_configured_key() {
    let config = CanvasConfig { storage_namespace: "test-".into(), ..CanvasConfig::default() };
    let s = PositionStore::new(MemoryStorage::new(), &config);
    assert_eq!(s.key(), "test-floating-positions");
}

// =============================================================
// PositionStore: debounced writes
// =============================================================

#[test]
fn persist_coalesces_burst_into_one_write() {
    let mut s = store();
    s.persist(&one_entry("a", 0.0, 0.0), 0.0);
    s.persist(&one_entry("a", 50.0, 0.0), 50.0);
    s.persist(&one_entry("a", 100.0, 0.0), 100.0);

    assert!(!s.tick(299.0).unwrap());
    assert_eq!(s.storage().writes(), 0);

    assert!(s.tick(300.0).unwrap());
    assert_eq!(s.storage().writes(), 1);

    let saved = s.load();
    assert_eq!(saved[&GoalId::new("a")], Point::new(100.0, 0.0));

    assert!(!s.tick(10_000.0).unwrap());
    assert_eq!(s.storage().writes(), 1);
}

#[test]
fn autosave_skips_empty_map() {
    let mut s = store();
    s.autosave(&PositionMap::new(), 0.0);
    assert!(!s.is_pending());
    assert!(!s.tick(1_000.0).unwrap());
    assert_eq!(s.storage().writes(), 0);
}

#[test]
fn autosave_fires_after_its_window() {
    let mut s = store();
    s.autosave(&one_entry("a", 1.0, 2.0), 0.0);
    assert!(!s.tick(499.0).unwrap());
    assert!(s.tick(500.0).unwrap());
    assert_eq!(s.load()[&GoalId::new("a")], Point::new(1.0, 2.0));
}

#[test]
fn drag_save_covers_its_autosave() {
    let mut s = store();
    s.persist(&one_entry("a", 5.0, 5.0), 0.0);
    assert_eq!(s.next_due(), Some(200.0));

    assert!(s.tick(200.0).unwrap());
    assert!(s.is_pending());
    assert!(!s.tick(500.0).unwrap());
    assert!(!s.is_pending());
    assert_eq!(s.storage().writes(), 1);
}

#[test]
fn separate_autosave_after_drag_writes_again() {
    let mut s = store();
    let map = one_entry("a", 5.0, 5.0);
    s.persist(&map, 0.0);
    s.autosave(&map, 0.0);

    assert!(s.tick(200.0).unwrap());
    assert!(s.tick(500.0).unwrap());
    assert_eq!(s.storage().writes(), 2);
}

#[test]
fn newer_autosave_still_lands_after_drag_write() {
    let mut s = store();
    s.persist(&one_entry("a", 5.0, 5.0), 0.0);
    s.autosave(&one_entry("a", 9.0, 9.0), 100.0);

    assert!(s.tick(200.0).unwrap());
    assert!(s.tick(600.0).unwrap());
    assert_eq!(s.load()[&GoalId::new("a")], Point::new(9.0, 9.0));
    assert_eq!(s.storage().writes(), 2);
}

#[test]
fn stale_autosave_never_overwrites_newer_drag_write() {
    let mut s = store();
    s.autosave(&one_entry("a", 1.0, 1.0), 0.0);
    s.persist(&one_entry("a", 7.0, 7.0), 400.0);

    assert!(s.tick(600.0).unwrap());
    assert_eq!(s.load()[&GoalId::new("a")], Point::new(7.0, 7.0));
    assert!(!s.tick(900.0).unwrap());
    assert_eq!(s.storage().writes(), 1);
    assert_eq!(s.load()[&GoalId::new("a")], Point::new(7.0, 7.0));
}

#[test]
fn next_due_is_earliest_deadline() {
    let mut s = store();
    assert_eq!(s.next_due(), None);
    s.autosave(&one_entry("a", 1.0, 1.0), 0.0);
    assert_eq!(s.next_due(), Some(500.0));
    s.persist(&one_entry("a", 1.0, 1.0), 100.0);
    assert_eq!(s.next_due(), Some(300.0));
}

#[test]
fn flush_writes_newest_immediately() {
    let mut s = store();
    s.persist(&one_entry("a", 1.0, 1.0), 0.0);
    s.autosave(&one_entry("a", 2.0, 2.0), 10.0);
    assert!(s.flush().unwrap());
    assert_eq!(s.storage().writes(), 1);
    assert_eq!(s.load()[&GoalId::new("a")], Point::new(2.0, 2.0));
    assert!(!s.is_pending());
}

#[test]
fn cancel_prevents_any_write() {
    let mut s = store();
    s.persist(&one_entry("a", 1.0, 1.0), 0.0);
    s.autosave(&one_entry("a", 1.0, 1.0), 0.0);
    assert!(s.cancel());
    assert!(!s.tick(10_000.0).unwrap());
    assert_eq!(s.storage().writes(), 0);
}

#[test]
fn written_json_round_trips_through_load() {
    let mut s = store();
    let mut map = one_entry("1", 100.0, 100.0);
    map.insert(GoalId::new("2"), Point::new(448.0, 100.0));
    s.write_now(&map).unwrap();
    assert_eq!(s.storage().get(KEY), Some(r#"{"1":{"x":100.0,"y":100.0},"2":{"x":448.0,"y":100.0}}"#));
    assert_eq!(s.load(), map);
}
