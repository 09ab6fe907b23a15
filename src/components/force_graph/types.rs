/// A node ready for the canvas renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	/// Tooltip text shown on hover.
	pub title: String,
	pub color: String,
	pub entity_type: Option<String>,
}

/// A directed edge, drawn with an arrow at `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub id: String,
	pub source: String,
	pub target: String,
	pub label: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	pub fn node_count_label(&self) -> String {
		format!("Nodes: {}", self.nodes.len())
	}

	pub fn edge_count_label(&self) -> String {
		format!("Edges: {}", self.links.len())
	}
}

/// Payload of the selection callback.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSelection {
	pub id: String,
	pub label: String,
	pub entity_type: Option<String>,
}
