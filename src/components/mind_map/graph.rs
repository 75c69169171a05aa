use indexmap::IndexMap;
use log::{debug, warn};
use thiserror::Error;

use super::style;
use super::types::{GraphSnapshot, MindMapEdge, MindMapNode, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
	#[error("node `{0}` already exists")]
	DuplicateNode(NodeId),

	#[error("edge `{0}` already exists")]
	DuplicateEdge(String),

	#[error("edge `{edge}` references missing node `{node}`")]
	MissingEndpoint { edge: String, node: NodeId },

	#[error("unknown node `{0}`")]
	UnknownNode(NodeId),

	#[error("child count of `{node}` cannot drop from {current} to {requested}")]
	ChildCountDecrease {
		node: NodeId,
		current: u32,
		requested: u32,
	},
}

/// Partial update of a node's data. Position is deliberately absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePatch {
	pub title: Option<String>,
	pub content: Option<String>,
	pub child_count: Option<u32>,
}

/// Authoritative node and edge collections of the canvas.
///
/// Every successful mutation bumps [`GraphModel::revision`]; rejected ones leave
/// the model untouched.
#[derive(Clone, Debug, Default)]
pub struct GraphModel {
	nodes: IndexMap<NodeId, MindMapNode>,
	edges: IndexMap<String, MindMapEdge>,
	revision: u64,
}

impl GraphModel {
	pub fn new() -> Self {
		Self::default()
	}

	/// A model holding only the root node.
	pub fn with_root(title: impl Into<String>) -> Self {
		let mut model = Self::new();
		let root = MindMapNode::root(title);
		model.nodes.insert(root.id.clone(), root);
		model
	}

	pub fn add_node(&mut self, node: MindMapNode) -> Result<(), GraphError> {
		if self.nodes.contains_key(&node.id) {
			warn!("Rejected duplicate node {}", node.id);
			return Err(GraphError::DuplicateNode(node.id));
		}
		debug!("Added node {} at ({}, {})", node.id, node.position.x, node.position.y);
		self.nodes.insert(node.id.clone(), node);
		self.revision += 1;
		Ok(())
	}

	pub fn add_edge(&mut self, edge: MindMapEdge) -> Result<(), GraphError> {
		if self.edges.contains_key(&edge.id) {
			warn!("Rejected duplicate edge {}", edge.id);
			return Err(GraphError::DuplicateEdge(edge.id));
		}
		for end in [&edge.source, &edge.target] {
			if !self.nodes.contains_key(end) {
				warn!("Rejected edge {} with dangling endpoint {}", edge.id, end);
				return Err(GraphError::MissingEndpoint {
					edge: edge.id.clone(),
					node: end.clone(),
				});
			}
		}
		debug!("Added edge {} ({} -> {})", edge.id, edge.source, edge.target);
		self.edges.insert(edge.id.clone(), edge);
		self.revision += 1;
		Ok(())
	}

	pub fn update_node(&mut self, id: &str, patch: NodePatch) -> Result<(), GraphError> {
		let node = self
			.nodes
			.get_mut(id)
			.ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;
		if let Some(requested) = patch.child_count {
			if requested < node.data.child_count {
				warn!("Rejected child count decrease on {id}");
				return Err(GraphError::ChildCountDecrease {
					node: id.to_string(),
					current: node.data.child_count,
					requested,
				});
			}
		}
		if let Some(title) = patch.title {
			node.data.title = title;
		}
		if let Some(content) = patch.content {
			node.data.content = content;
		}
		if let Some(count) = patch.child_count {
			node.data.child_count = count;
		}
		self.revision += 1;
		Ok(())
	}

	/// Apply the canonical edge style to the whole edge collection.
	pub fn normalize_edges(&mut self) {
		if style::normalize(self.edges.values_mut()) > 0 {
			self.revision += 1;
		}
	}

	pub fn snapshot(&self) -> GraphSnapshot {
		GraphSnapshot {
			nodes: self.nodes.values().cloned().collect(),
			edges: self.edges.values().cloned().collect(),
		}
	}

	pub fn node(&self, id: &str) -> Option<&MindMapNode> {
		self.nodes.get(id)
	}

	#[cfg(test)]
	pub fn edge(&self, id: &str) -> Option<&MindMapEdge> {
		self.edges.get(id)
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.nodes.contains_key(id)
	}

	pub fn contains_edge(&self, id: &str) -> bool {
		self.edges.contains_key(id)
	}

	pub fn nodes(&self) -> impl Iterator<Item = &MindMapNode> {
		self.nodes.values()
	}

	pub fn edges(&self) -> impl Iterator<Item = &MindMapEdge> {
		self.edges.values()
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// Whether an edge with exactly these endpoints and anchors exists.
	pub fn has_connection(&self, source: &str, sh: &str, target: &str, th: &str) -> bool {
		self.edges.values().any(|e| {
			e.source == source
				&& e.target == target
				&& e.source_handle() == sh
				&& e.target_handle() == th
		})
	}

	pub fn revision(&self) -> u64 {
		self.revision
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mind_map::types::{NodeData, Position, ROOT_ID};

	fn node(id: &str) -> MindMapNode {
		MindMapNode {
			id: id.to_string(),
			data: NodeData {
				title: id.to_uppercase(),
				content: String::new(),
				child_count: 0,
			},
			position: Position::new(1.0, 2.0),
		}
	}

	#[test]
	fn with_root_has_single_node_and_no_edges() {
		let model = GraphModel::with_root("Plan");
		assert_eq!(model.node_count(), 1);
		assert_eq!(model.edge_count(), 0);
		assert_eq!(model.node(ROOT_ID).map(|n| n.data.title.as_str()), Some("Plan"));
	}

	#[test]
	fn duplicate_node_is_not_overwritten() {
		let mut model = GraphModel::with_root("Plan");
		let mut dup = node(ROOT_ID);
		dup.data.title = "Impostor".into();
		let rev = model.revision();
		assert_eq!(
			model.add_node(dup),
			Err(GraphError::DuplicateNode(ROOT_ID.to_string()))
		);
		assert_eq!(model.node(ROOT_ID).unwrap().data.title, "Plan");
		assert_eq!(model.revision(), rev);
	}

	#[test]
	fn edge_with_missing_endpoint_is_rejected() {
		let mut model = GraphModel::with_root("Plan");
		let err = model
			.add_edge(MindMapEdge::parent_to_child(ROOT_ID, "ghost"))
			.unwrap_err();
		assert_eq!(
			err,
			GraphError::MissingEndpoint {
				edge: "e1-ghost".into(),
				node: "ghost".into(),
			}
		);
		assert_eq!(model.edge_count(), 0);
	}

	#[test]
	fn duplicate_edge_is_rejected() {
		let mut model = GraphModel::with_root("Plan");
		model.add_node(node("a")).unwrap();
		model.add_edge(MindMapEdge::parent_to_child(ROOT_ID, "a")).unwrap();
		assert!(matches!(
			model.add_edge(MindMapEdge::parent_to_child(ROOT_ID, "a")),
			Err(GraphError::DuplicateEdge(_))
		));
		assert_eq!(model.edge_count(), 1);
	}

	#[test]
	fn update_node_leaves_position_alone() {
		let mut model = GraphModel::new();
		model.add_node(node("a")).unwrap();
		model
			.update_node(
				"a",
				NodePatch {
					title: Some("Renamed".into()),
					child_count: Some(3),
					..Default::default()
				},
			)
			.unwrap();
		let a = model.node("a").unwrap();
		assert_eq!(a.data.title, "Renamed");
		assert_eq!(a.data.content, "");
		assert_eq!(a.data.child_count, 3);
		assert_eq!(a.position, Position::new(1.0, 2.0));
	}

	#[test]
	fn child_count_never_decreases() {
		let mut model = GraphModel::with_root("Plan");
		let grow = |n| NodePatch {
			child_count: Some(n),
			..Default::default()
		};
		model.update_node(ROOT_ID, grow(2)).unwrap();
		let rev = model.revision();
		assert_eq!(
			model.update_node(
				ROOT_ID,
				NodePatch {
					title: Some("Renamed".into()),
					child_count: Some(1),
					..Default::default()
				}
			),
			Err(GraphError::ChildCountDecrease {
				node: ROOT_ID.into(),
				current: 2,
				requested: 1,
			})
		);
		let root = model.node(ROOT_ID).unwrap();
		assert_eq!(root.data.child_count, 2);
		assert_eq!(root.data.title, "Plan");
		assert_eq!(model.revision(), rev);
		assert!(model.update_node(ROOT_ID, grow(2)).is_ok());
	}

	#[test]
	fn update_unknown_node_fails() {
		let mut model = GraphModel::new();
		assert_eq!(
			model.update_node("nope", NodePatch::default()),
			Err(GraphError::UnknownNode("nope".into()))
		);
	}

	#[test]
	fn snapshot_keeps_insertion_order() {
		let mut model = GraphModel::with_root("Plan");
		for id in ["c", "a", "b"] {
			model.add_node(node(id)).unwrap();
		}
		let ids: Vec<_> = model.snapshot().nodes.into_iter().map(|n| n.id).collect();
		assert_eq!(ids, vec!["1", "c", "a", "b"]);
	}

	#[test]
	fn revision_tracks_mutations() {
		let mut model = GraphModel::with_root("Plan");
		assert_eq!(model.revision(), 0);
		model.add_node(node("a")).unwrap();
		model.add_edge(MindMapEdge::parent_to_child(ROOT_ID, "a")).unwrap();
		assert_eq!(model.revision(), 2);
		model.normalize_edges();
		assert_eq!(model.revision(), 3);
		model.normalize_edges();
		assert_eq!(model.revision(), 3);
	}
}
