use std::collections::BTreeMap;

use glam::DVec3;
use serde_json::Value;

/// Display metadata carried by every node. `label` and `description` are
/// always resolved; everything else from the raw payload lands in
/// `attributes`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeData {
	pub label: String,
	pub description: String,
	pub attributes: BTreeMap<String, Value>,
}

impl NodeData {
	pub fn attribute_str(&self, key: &str) -> Option<&str> {
		self.attributes.get(key).and_then(Value::as_str)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub position: DVec3,
	pub color: Option<String>,
	pub data: NodeData,
}

impl Node {
	/// Label shown to the user, falling back to the id when the label is blank.
	pub fn display_label(&self) -> &str {
		if self.data.label.trim().is_empty() {
			&self.id
		} else {
			&self.data.label
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub id: String,
	pub source: String,
	pub target: String,
	/// Relative spring strength in `[0, 1]`; `None` means the layout default.
	pub strength: Option<f64>,
}

impl Edge {
	pub fn is_self_loop(&self) -> bool {
		self.source == self.target
	}
}

/// One hydrated graph snapshot. Replaced wholesale on every fetch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

impl GraphData {
	/// Too little data to be worth drawing: no nodes or no edges.
	pub fn is_insufficient(&self) -> bool {
		self.nodes.is_empty() || self.edges.is_empty()
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_label_falls_back_to_id() {
		let node = Node {
			id: "n-1".into(),
			position: DVec3::ZERO,
			color: None,
			data: NodeData {
				label: "  ".into(),
				..Default::default()
			},
		};
		assert_eq!(node.display_label(), "n-1");
	}
}
