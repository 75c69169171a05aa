use super::style::EdgeStyle;

/// Identifier shared by nodes and edges.
pub type NodeId = String;

pub const ROOT_ID: &str = "1";
pub const DEFAULT_ROOT_TITLE: &str = "My Mind Map";
pub const ROOT_CONTENT: &str = "Root node content. Click the button below to add child nodes!";
pub const PLACEHOLDER_CONTENT: &str = "No description provided";
pub const ROOT_POSITION: Position = Position { x: 250.0, y: 50.0 };

/// Outbound anchor on the bottom edge of a node card.
pub const SOURCE_HANDLE: &str = "bottom";
/// Inbound anchor on the top edge of a node card.
pub const TARGET_HANDLE: &str = "top";

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

impl Position {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeData {
	pub title: String,
	pub content: String,
	/// Auto-created children so far; drives sibling placement and child ids.
	pub child_count: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MindMapNode {
	pub id: NodeId,
	pub data: NodeData,
	pub position: Position,
}

impl MindMapNode {
	pub fn root(title: impl Into<String>) -> Self {
		Self {
			id: ROOT_ID.to_string(),
			data: NodeData {
				title: title.into(),
				content: ROOT_CONTENT.to_string(),
				child_count: 0,
			},
			position: ROOT_POSITION,
		}
	}

	/// Id of the `n`-th (1-based) auto-created child of this node.
	pub fn child_id(&self, n: u32) -> NodeId {
		format!("{}-{}", self.id, n)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct MindMapEdge {
	pub id: String,
	pub source: NodeId,
	pub target: NodeId,
	pub source_handle: Option<String>,
	pub target_handle: Option<String>,
	pub style: EdgeStyle,
}

impl MindMapEdge {
	/// Parent to child edge created by the add-child workflow.
	pub fn parent_to_child(parent: &str, child: &str) -> Self {
		Self {
			id: format!("e{parent}-{child}"),
			source: parent.to_string(),
			target: child.to_string(),
			source_handle: Some(SOURCE_HANDLE.to_string()),
			target_handle: Some(TARGET_HANDLE.to_string()),
			style: EdgeStyle::auto_created(),
		}
	}

	/// Edge drawn by hand between two existing nodes.
	pub fn from_connection(conn: &Connection) -> Self {
		let (sh, th) = conn.handles();
		Self {
			id: format!("e{}{}-{}{}", conn.source, sh, conn.target, th),
			source: conn.source.clone(),
			target: conn.target.clone(),
			source_handle: Some(sh.to_string()),
			target_handle: Some(th.to_string()),
			style: EdgeStyle::manual_draw(),
		}
	}

	pub fn source_handle(&self) -> &str {
		self.source_handle.as_deref().unwrap_or(SOURCE_HANDLE)
	}

	pub fn target_handle(&self) -> &str {
		self.target_handle.as_deref().unwrap_or(TARGET_HANDLE)
	}
}

/// A connection gesture reported by the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	pub source: NodeId,
	pub target: NodeId,
	pub source_handle: Option<String>,
	pub target_handle: Option<String>,
}

impl Connection {
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			source_handle: None,
			target_handle: None,
		}
	}

	pub fn with_handles(mut self, source_handle: &str, target_handle: &str) -> Self {
		self.source_handle = Some(source_handle.to_string());
		self.target_handle = Some(target_handle.to_string());
		self
	}

	pub fn handles(&self) -> (&str, &str) {
		(
			self.source_handle.as_deref().unwrap_or(SOURCE_HANDLE),
			self.target_handle.as_deref().unwrap_or(TARGET_HANDLE),
		)
	}
}

/// Rendering snapshot of the whole map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSnapshot {
	pub nodes: Vec<MindMapNode>,
	pub edges: Vec<MindMapEdge>,
}

impl GraphSnapshot {
	pub fn node(&self, id: &str) -> Option<&MindMapNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}
