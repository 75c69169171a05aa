//! Visual attributes stamped on every edge.

use super::types::MindMapEdge;

pub const ACCENT_COLOR: &str = "#00FFFF";
pub const AUTO_STROKE_WIDTH: f64 = 3.0;
pub const MANUAL_STROKE_WIDTH: f64 = 5.0;
pub const EDGE_Z_INDEX: i32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveKind {
	/// Orthogonal routing with rounded corners.
	SmoothStep,
	Straight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerKind {
	ArrowClosed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
	pub kind: MarkerKind,
	pub color: &'static str,
	pub width: f64,
	pub height: f64,
}

impl Marker {
	fn arrow(size: f64) -> Self {
		Self {
			kind: MarkerKind::ArrowClosed,
			color: ACCENT_COLOR,
			width: size,
			height: size,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub curve: CurveKind,
	pub animated: bool,
	pub stroke: &'static str,
	pub stroke_width: f64,
	pub marker_end: Marker,
	pub z_index: Option<i32>,
}

impl EdgeStyle {
	/// The style every edge converges to after a normalisation pass.
	pub fn canonical() -> Self {
		Self {
			z_index: Some(EDGE_Z_INDEX),
			..Self::auto_created()
		}
	}

	pub fn auto_created() -> Self {
		Self {
			curve: CurveKind::SmoothStep,
			animated: true,
			stroke: ACCENT_COLOR,
			stroke_width: AUTO_STROKE_WIDTH,
			marker_end: Marker::arrow(20.0),
			z_index: None,
		}
	}

	/// A freshly drawn manual connection, before the next normalisation.
	pub fn manual_draw() -> Self {
		Self {
			curve: CurveKind::Straight,
			animated: true,
			stroke: ACCENT_COLOR,
			stroke_width: MANUAL_STROKE_WIDTH,
			marker_end: Marker::arrow(25.0),
			z_index: None,
		}
	}
}

/// Re-stamp the canonical style on every edge. Returns how many edges changed.
pub fn normalize<'a>(edges: impl IntoIterator<Item = &'a mut MindMapEdge>) -> usize {
	let canonical = EdgeStyle::canonical();
	let mut changed = 0;
	for edge in edges {
		if edge.style != canonical {
			edge.style = canonical.clone();
			changed += 1;
		}
	}
	changed
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mind_map::types::Connection;

	fn sample_edges() -> Vec<MindMapEdge> {
		vec![
			MindMapEdge::parent_to_child("1", "1-1"),
			MindMapEdge::from_connection(&Connection::new("1-1", "1-2")),
		]
	}

	#[test]
	fn manual_edges_start_straight_and_wide() {
		let edge = MindMapEdge::from_connection(&Connection::new("1-1", "1-2"));
		assert_eq!(edge.style.curve, CurveKind::Straight);
		assert_eq!(edge.style.stroke_width, MANUAL_STROKE_WIDTH);
		assert!(edge.style.animated);
	}

	#[test]
	fn normalize_converges_every_edge() {
		let mut edges = sample_edges();
		assert_eq!(normalize(edges.iter_mut()), 2);
		for edge in &edges {
			assert_eq!(edge.style, EdgeStyle::canonical());
			assert_eq!(edge.style.curve, CurveKind::SmoothStep);
			assert_eq!(edge.style.stroke_width, AUTO_STROKE_WIDTH);
			assert_eq!(edge.style.marker_end.kind, MarkerKind::ArrowClosed);
			assert_eq!(edge.style.marker_end.color, ACCENT_COLOR);
		}
	}

	#[test]
	fn normalize_is_idempotent() {
		let mut edges = sample_edges();
		normalize(edges.iter_mut());
		let once = edges.clone();
		assert_eq!(normalize(edges.iter_mut()), 0);
		assert_eq!(edges, once);
	}

	#[test]
	fn normalize_keeps_identity_fields() {
		let mut edges = sample_edges();
		let before: Vec<_> = edges
			.iter()
			.map(|e| (e.id.clone(), e.source.clone(), e.target.clone()))
			.collect();
		normalize(edges.iter_mut());
		let after: Vec<_> = edges
			.iter()
			.map(|e| (e.id.clone(), e.source.clone(), e.target.clone()))
			.collect();
		assert_eq!(before, after);
	}
}
