//! User actions to graph mutations.
//!
//! The controller owns the [`GraphModel`] and the creation dialog. Every operation
//! validates first and mutates second, so a rejected action leaves no trace.

use log::{debug, info, warn};
use thiserror::Error;

use super::dialog::DialogState;
use super::graph::{GraphError, GraphModel, NodePatch};
use super::layout::compute_child_position;
use super::types::{
	Connection, GraphSnapshot, MindMapEdge, MindMapNode, NodeData, NodeId, PLACEHOLDER_CONTENT,
	ROOT_ID,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
	#[error("no node creation in progress")]
	NotComposing,

	#[error("a node needs a title")]
	EmptyTitle,

	#[error("parent node `{0}` does not exist")]
	MissingParent(NodeId),

	#[error("`{from}` is already connected to `{to}`")]
	DuplicateConnection { from: NodeId, to: NodeId },

	#[error("node `{0}` cannot take more children")]
	ChildLimit(NodeId),

	#[error(transparent)]
	Graph(#[from] GraphError),
}

/// Local edit of a node's text. Child counts only move through [`MindMapController::submit`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextPatch {
	pub title: Option<String>,
	pub content: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Idle,
	Composing,
}

#[derive(Clone, Debug)]
pub struct MindMapController {
	model: GraphModel,
	dialog: DialogState,
	/// Last entry-parameter title written to the root.
	applied_root_title: Option<String>,
	focus_requested: bool,
	reconcile: Vec<NodeId>,
}

impl MindMapController {
	pub fn new(root_title: impl Into<String>) -> Self {
		let mut model = GraphModel::with_root(root_title);
		model.normalize_edges();
		Self {
			model,
			dialog: DialogState::default(),
			applied_root_title: None,
			focus_requested: false,
			reconcile: Vec::new(),
		}
	}

	pub fn phase(&self) -> Phase {
		if self.dialog.is_open {
			Phase::Composing
		} else {
			Phase::Idle
		}
	}

	pub fn model(&self) -> &GraphModel {
		&self.model
	}

	pub fn dialog(&self) -> &DialogState {
		&self.dialog
	}

	pub fn snapshot(&self) -> GraphSnapshot {
		self.model.snapshot()
	}

	/// Open the creation dialog for `parent`.
	pub fn request_add_child(&mut self, parent: &str) -> Result<(), ControllerError> {
		if !self.model.contains_node(parent) {
			warn!("Add child requested for unknown node {parent}");
			return Err(ControllerError::MissingParent(parent.to_string()));
		}
		self.dialog.open_for(parent);
		self.focus_requested = true;
		debug!("Composing child of {parent}");
		Ok(())
	}

	pub fn set_title_input(&mut self, value: impl Into<String>) {
		if self.dialog.is_open {
			self.dialog.title_input = value.into();
		}
	}

	pub fn set_content_input(&mut self, value: impl Into<String>) {
		if self.dialog.is_open {
			self.dialog.content_input = value.into();
		}
	}

	pub fn cancel(&mut self) {
		if self.dialog.is_open {
			debug!("Node creation cancelled");
		}
		self.dialog.close();
	}

	/// Create the composed child. Returns its id.
	pub fn submit(&mut self) -> Result<NodeId, ControllerError> {
		let parent_id = match (&self.dialog.selected_parent_id, self.dialog.is_open) {
			(Some(id), true) => id.clone(),
			_ => return Err(ControllerError::NotComposing),
		};
		if self.dialog.title_input.trim().is_empty() {
			return Err(ControllerError::EmptyTitle);
		}
		let Some(parent) = self.model.node(&parent_id) else {
			warn!("Parent {parent_id} vanished while composing");
			self.dialog.close();
			return Err(ControllerError::MissingParent(parent_id));
		};

		let existing = parent.data.child_count;
		let Some(next) = existing.checked_add(1) else {
			warn!("{parent_id} has no room for another child");
			return Err(ControllerError::ChildLimit(parent_id));
		};
		let child_id = parent.child_id(next);
		if self.model.contains_node(&child_id) {
			return Err(GraphError::DuplicateNode(child_id).into());
		}
		let edge = MindMapEdge::parent_to_child(&parent_id, &child_id);
		if self.model.contains_edge(&edge.id) {
			return Err(GraphError::DuplicateEdge(edge.id).into());
		}

		let content = if self.dialog.content_input.is_empty() {
			PLACEHOLDER_CONTENT.to_string()
		} else {
			self.dialog.content_input.clone()
		};
		let child = MindMapNode {
			id: child_id.clone(),
			data: NodeData {
				title: self.dialog.title_input.clone(),
				content,
				child_count: 0,
			},
			position: compute_child_position(parent.position, existing),
		};

		self.model.add_node(child)?;
		self.model.add_edge(edge)?;
		self.model.update_node(
			&parent_id,
			NodePatch {
				child_count: Some(next),
				..Default::default()
			},
		)?;
		self.model.normalize_edges();
		self.dialog.close();
		self.reconcile.push(child_id.clone());
		self.reconcile.push(parent_id.clone());
		debug!(
			"Created {child_id} under {parent_id} ({} nodes, {} edges)",
			self.model.node_count(),
			self.model.edge_count()
		);
		Ok(child_id)
	}

	/// Add an edge the user drew between two existing nodes.
	pub fn connect(&mut self, conn: Connection) -> Result<String, ControllerError> {
		let (sh, th) = conn.handles();
		if self
			.model
			.has_connection(&conn.source, sh, &conn.target, th)
		{
			warn!("Ignoring repeated connection {} -> {}", conn.source, conn.target);
			return Err(ControllerError::DuplicateConnection {
				from: conn.source,
				to: conn.target,
			});
		}
		let edge = MindMapEdge::from_connection(&conn);
		let id = edge.id.clone();
		self.model.add_edge(edge)?;
		Ok(id)
	}

	/// Apply the page's entry-parameter title to the root.
	///
	/// Only a value different from the last one applied is written, so a local
	/// rename survives until the parameter itself changes. Returns whether the
	/// root was retitled.
	pub fn sync_root_title(&mut self, title: Option<&str>) -> Result<bool, ControllerError> {
		let Some(title) = title.filter(|t| !t.is_empty()) else {
			return Ok(false);
		};
		if self.applied_root_title.as_deref() == Some(title) {
			return Ok(false);
		}
		self.model.update_node(
			ROOT_ID,
			NodePatch {
				title: Some(title.to_string()),
				..Default::default()
			},
		)?;
		self.model.normalize_edges();
		self.applied_root_title = Some(title.to_string());
		self.reconcile.push(ROOT_ID.to_string());
		info!("Root title set to {title:?}");
		Ok(true)
	}

	/// Local edit of a node's text.
	pub fn update_node(&mut self, id: &str, patch: TextPatch) -> Result<(), ControllerError> {
		self.model.update_node(
			id,
			NodePatch {
				title: patch.title,
				content: patch.content,
				child_count: None,
			},
		)?;
		self.model.normalize_edges();
		self.reconcile.push(id.to_string());
		Ok(())
	}

	/// Consume a pending input-focus request raised by opening the dialog.
	pub fn take_focus_request(&mut self) -> bool {
		std::mem::take(&mut self.focus_requested)
	}

	/// Nodes whose handle geometry should be re-measured by the surface.
	pub fn take_reconciliation(&mut self) -> Vec<NodeId> {
		std::mem::take(&mut self.reconcile)
	}

	#[cfg(test)]
	pub(crate) fn model_mut(&mut self) -> &mut GraphModel {
		&mut self.model
	}
}
