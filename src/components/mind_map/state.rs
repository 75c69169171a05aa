use std::collections::HashMap;

use super::types::{GraphSnapshot, MindMapNode, NodeId, Position, TARGET_HANDLE};

pub const DEFAULT_NODE_WIDTH: f64 = 192.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 128.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 0.8 }
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Position {
		Position::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Zoom one wheel notch around the screen point (sx, sy).
	pub fn zoom_at(&self, sx: f64, sy: f64, delta_y: f64) -> Self {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = k / self.k;
		Self {
			x: sx - (sx - self.x) * ratio,
			y: sy - (sy - self.y) * ratio,
			k,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// A connection being dragged out of a node's outbound handle.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectDrag {
	pub source: NodeId,
	/// Cursor in graph space; `None` until the pointer first moves.
	pub cursor: Option<Position>,
}

/// Measured node card sizes used to place handle anchors.
#[derive(Clone, Debug, Default)]
pub struct NodeGeometry {
	sizes: HashMap<NodeId, (f64, f64)>,
}

impl NodeGeometry {
	pub fn set(&mut self, id: &str, width: f64, height: f64) {
		if width > 0.0 && height > 0.0 {
			self.sizes.insert(id.to_string(), (width, height));
		}
	}

	pub fn size_of(&self, id: &str) -> (f64, f64) {
		self.sizes
			.get(id)
			.copied()
			.unwrap_or((DEFAULT_NODE_WIDTH, DEFAULT_NODE_HEIGHT))
	}

	/// Graph-space point of `handle` on `node`: top centre or bottom centre.
	pub fn anchor(&self, node: &MindMapNode, handle: &str) -> Position {
		let (w, h) = self.size_of(&node.id);
		let x = node.position.x + w / 2.0;
		if handle == TARGET_HANDLE {
			Position::new(x, node.position.y)
		} else {
			Position::new(x, node.position.y + h)
		}
	}
}

/// Canvas-side state that changes every frame and never drives the DOM.
#[derive(Clone, Debug, Default)]
pub struct CanvasState {
	pub pan: PanState,
	pub geometry: NodeGeometry,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	/// Last graph snapshot drawn, and the model revision it came from.
	pub scene: GraphSnapshot,
	scene_revision: Option<u64>,
}

impl CanvasState {
	/// Refresh the cached scene when the model revision moved. Returns whether it did.
	pub fn sync_scene(&mut self, revision: u64, snapshot: impl FnOnce() -> GraphSnapshot) -> bool {
		if self.scene_revision == Some(revision) {
			return false;
		}
		self.scene = snapshot();
		self.scene_revision = Some(revision);
		true
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mind_map::types::{MindMapNode, SOURCE_HANDLE};

	#[test]
	fn screen_to_graph_inverts_transform() {
		let t = ViewTransform { x: 100.0, y: 50.0, k: 2.0 };
		assert_eq!(t.screen_to_graph(300.0, 150.0), Position::new(100.0, 50.0));
	}

	#[test]
	fn zoom_keeps_cursor_point_fixed() {
		let t = ViewTransform::default();
		let before = t.screen_to_graph(400.0, 300.0);
		let zoomed = t.zoom_at(400.0, 300.0, -1.0);
		let after = zoomed.screen_to_graph(400.0, 300.0);
		assert!((before.x - after.x).abs() < 1e-9);
		assert!((before.y - after.y).abs() < 1e-9);
		assert!(zoomed.k > t.k);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut t = ViewTransform::default();
		for _ in 0..200 {
			t = t.zoom_at(0.0, 0.0, 1.0);
		}
		assert_eq!(t.k, MIN_ZOOM);
	}

	#[test]
	fn anchors_use_measured_size_when_known() {
		let root = MindMapNode::root("Root");
		let mut geometry = NodeGeometry::default();
		assert_eq!(
			geometry.anchor(&root, TARGET_HANDLE),
			Position::new(250.0 + DEFAULT_NODE_WIDTH / 2.0, 50.0)
		);
		geometry.set(&root.id, 300.0, 100.0);
		assert_eq!(geometry.anchor(&root, SOURCE_HANDLE), Position::new(400.0, 150.0));
	}

	#[test]
	fn scene_refreshes_only_on_new_revision() {
		use crate::components::mind_map::controller::MindMapController;
		use crate::components::mind_map::types::ROOT_ID;

		let mut ctl = MindMapController::new("Root");
		let mut state = CanvasState::default();
		assert!(state.sync_scene(ctl.model().revision(), || ctl.snapshot()));
		assert!(!state.sync_scene(ctl.model().revision(), || ctl.snapshot()));
		assert_eq!(state.scene.nodes.len(), 1);

		ctl.request_add_child(ROOT_ID).unwrap();
		ctl.set_title_input("A");
		ctl.submit().unwrap();
		assert!(state.sync_scene(ctl.model().revision(), || ctl.snapshot()));
		assert_eq!(state.scene.nodes.len(), 2);
		assert_eq!(state.scene.edges.len(), 1);
		assert!(state.scene.node("1-1").is_some());
	}

	#[test]
	fn unmounted_measurements_are_ignored() {
		let mut geometry = NodeGeometry::default();
		geometry.set("1", 0.0, 0.0);
		assert_eq!(geometry.size_of("1"), (DEFAULT_NODE_WIDTH, DEFAULT_NODE_HEIGHT));
	}
}
