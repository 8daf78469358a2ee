#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::goal::{Goal, GoalId};
use crate::layout::LayoutConstants;
use crate::positions::PositionMap;

/// Canvas-local position a card is drawn at. Goals without an entry render
/// at the origin.
#[must_use]
pub fn card_position(positions: &PositionMap, id: &GoalId) -> Point {
    positions.get(id).copied().unwrap_or_default()
}

/// Test which card (if any) is under `screen_pt`.
///
/// Cards are drawn in goal order, so when cards overlap the later goal is on
/// top and wins.
#[must_use]
pub fn card_at(
    screen_pt: Point,
    goals: &[Goal],
    positions: &PositionMap,
    camera: &Camera,
    layout: &LayoutConstants,
) -> Option<GoalId> {
    let local = camera.screen_to_canvas(screen_pt, layout.canvas_size());
    goals
        .iter()
        .rev()
        .find(|goal| {
            let origin = card_position(positions, &goal.id);
            local.x >= origin.x
                && local.x <= origin.x + layout.card_width
                && local.y >= origin.y
                && local.y <= origin.y + layout.card_height
        })
        .map(|goal| goal.id.clone())
}
