//! Layout engine: card sizes, grid shape, and canvas extent.
//!
//! Everything here is a pure function of the goal count and a coarse
//! viewport classification, so the same inputs always produce the same
//! canvas. The grid leans toward more columns than rows because cards are
//! taller than they are wide.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::camera::{Bounds, Point, Size};
use crate::consts::*;

/// Placement rectangle for a card's top-left corner, in canvas-local pixels.
pub type Constraints = Bounds;

/// Coarse window-size bucket that selects the card preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl ViewportClass {
    /// Classify a measured window width in CSS pixels.
    #[must_use]
    pub fn from_width(width: f64) -> Self {
        if width < MOBILE_MAX_WIDTH {
            Self::Mobile
        } else if width < TABLET_MAX_WIDTH {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }

    /// Card width/height preset for this class.
    #[must_use]
    pub fn card_size(self) -> Size {
        match self {
            Self::Mobile => Size::new(MOBILE_CARD_WIDTH, MOBILE_CARD_HEIGHT),
            Self::Tablet => Size::new(TABLET_CARD_WIDTH, TABLET_CARD_HEIGHT),
            Self::Desktop => Size::new(DESKTOP_CARD_WIDTH, DESKTOP_CARD_HEIGHT),
        }
    }
}

/// Derived layout numbers for one (goal count, viewport class) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConstants {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub card_width: f64,
    pub card_height: f64,
    pub columns: usize,
    pub rows: usize,
    pub margin: f64,
    pub padding: f64,
}

impl LayoutConstants {
    #[must_use]
    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    #[must_use]
    pub fn card_size(&self) -> Size {
        Size::new(self.card_width, self.card_height)
    }

    /// Valid top-left placement bounds for a card.
    #[must_use]
    pub fn constraints(&self) -> Constraints {
        Bounds {
            left: self.padding,
            right: self.canvas_width - self.card_width - self.padding,
            top: self.padding,
            bottom: self.canvas_height - self.card_height - self.padding,
        }
    }

    /// Top-left corner of grid slot `index`, filled row by row.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn grid_position(&self, index: usize) -> Point {
        let columns = self.columns.max(1);
        let row = index / columns;
        let col = index % columns;
        Point {
            x: self.padding + col as f64 * (self.card_width + self.margin),
            y: self.padding + row as f64 * (self.card_height + self.margin),
        }
    }
}

/// Compute layout constants for `goal_count` cards.
///
/// A count of zero is treated as one so the grid always has columns and the
/// canvas falls back to its minimum size.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compute_layout(goal_count: usize, viewport_class: ViewportClass) -> LayoutConstants {
    let card = viewport_class.card_size();
    let count = goal_count.max(1);

    let columns = ((count as f64 * COLUMN_BIAS).sqrt().ceil() as usize).max(MIN_COLUMNS);
    let rows = count.div_ceil(columns);

    let canvas_width = (columns as f64 * (card.width + CARD_MARGIN) + CANVAS_PADDING * 2.0).max(MIN_CANVAS_WIDTH);
    let canvas_height = (rows as f64 * (card.height + CARD_MARGIN) + CANVAS_PADDING * 2.0).max(MIN_CANVAS_HEIGHT);

    LayoutConstants {
        canvas_width,
        canvas_height,
        card_width: card.width,
        card_height: card.height,
        columns,
        rows,
        margin: CARD_MARGIN,
        padding: CANVAS_PADDING,
    }
}
