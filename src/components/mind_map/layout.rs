//! Deterministic placement of new children below their parent.
//!
//! Children fan out left and right with growing distance. There is no collision
//! detection against other subtrees; the canvas pans and zooms freely.

use super::types::Position;

pub const VERTICAL_SPACING: f64 = 250.0;
pub const HORIZONTAL_SPACING: f64 = 350.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spacing {
	pub vertical: f64,
	pub horizontal: f64,
}

impl Default for Spacing {
	fn default() -> Self {
		Self {
			vertical: VERTICAL_SPACING,
			horizontal: HORIZONTAL_SPACING,
		}
	}
}

impl Spacing {
	/// Position of the child with 0-based sibling index `existing`.
	pub fn child_position(&self, parent: Position, existing: u32) -> Position {
		let n = existing as f64;
		let sign = if existing % 2 == 1 { 1.0 } else { -1.0 };
		let steps = if existing % 2 == 0 {
			((n + 1.0) / 2.0).ceil()
		} else {
			(n / 2.0 + 1.0).floor()
		};
		Position {
			x: parent.x + sign * steps * self.horizontal,
			y: parent.y + self.vertical,
		}
	}
}

/// Place a child using the default spacing.
pub fn compute_child_position(parent: Position, existing: u32) -> Position {
	Spacing::default().child_position(parent, existing)
}
