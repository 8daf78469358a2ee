#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Transition
// =============================================================

#[test]
fn transition_none_is_instant() {
    assert!(Transition::NONE.is_instant());
    assert_eq!(Transition::NONE.css(), "none");
}

#[test]
fn transition_eased_css() {
    let t = Transition::eased(300.0);
    assert!(!t.is_instant());
    assert_eq!(t.easing, Easing::EaseOut);
    assert_eq!(t.css(), "transform 300ms ease-out");
}

// =============================================================
// Overlay
// =============================================================

#[test]
fn overlay_constructors_carry_copy() {
    assert_eq!(
        Overlay::empty(),
        Overlay::Empty { title: "No Goals in Floating View", message: "Add some goals to see them floating here!" }
    );
    assert_eq!(
        Overlay::usage_hint(),
        Overlay::UsageHint { message: "Drag cards to reposition. Ctrl+Scroll to zoom. Drag background to pan." }
    );
    assert_eq!(
        Overlay::locked(),
        Overlay::Locked { title: "Cards Locked", message: "Cards are locked in position" }
    );
}

#[test]
fn overlay_serializes_with_kind_tag() {
    let json = serde_json::to_value(Overlay::locked()).unwrap();
    assert_eq!(json["kind"], "locked");
    assert_eq!(json["title"], "Cards Locked");

    let json = serde_json::to_value(Overlay::usage_hint()).unwrap();
    assert_eq!(json["kind"], "usage_hint");
}

// =============================================================
// background_pattern
// =============================================================

#[test]
fn background_pattern_depends_on_theme() {
    assert!(background_pattern(true).contains("255,255,255"));
    assert!(background_pattern(false).contains("0,0,0"));
}
