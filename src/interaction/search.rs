//! Text search over the current node set, and the remote search payloads.

use serde::Deserialize;

use crate::graph::Node;

/// Local matches shown under the search box.
pub const MAX_LOCAL_MATCHES: usize = 8;
/// Hits requested from `GET /api/search`.
pub const REMOTE_LIMIT: usize = 5;

/// One entry of `GET /api/search`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SearchHit {
	pub id: String,
	pub label: String,
	#[serde(default)]
	pub sector: Option<String>,
	#[serde(default)]
	pub score: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SearchResponse {
	#[serde(default)]
	pub query: String,
	#[serde(default)]
	pub results: Vec<SearchHit>,
}

/// A node picked as the camera's focus target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FocusSelection {
	pub node_id: String,
	/// Text to put back into the search box.
	pub label: String,
}

impl FocusSelection {
	pub fn for_node(node: &Node) -> Self {
		Self {
			node_id: node.id.clone(),
			label: node.display_label().to_owned(),
		}
	}
}

/// Nodes whose label or id contains `query` (trimmed, case-insensitive), in
/// graph order, at most `limit`.
pub fn match_nodes<'a>(nodes: &'a [Node], query: &str, limit: usize) -> Vec<&'a Node> {
	let term = query.trim().to_lowercase();
	if term.is_empty() {
		return Vec::new();
	}
	nodes
		.iter()
		.filter(|n| n.data.label.to_lowercase().contains(&term) || n.id.to_lowercase().contains(&term))
		.take(limit)
		.collect()
}

/// What pressing enter in the search box focuses: the first local match.
pub fn resolve_submission(nodes: &[Node], query: &str) -> Option<FocusSelection> {
	match_nodes(nodes, query, 1).first().map(|n| FocusSelection::for_node(n))
}

/// Resolves a remote hit against the nodes on screen. Hits for nodes that are
/// not in the current snapshot cannot be focused.
pub fn select_hit(nodes: &[Node], hit: &SearchHit) -> Option<FocusSelection> {
	nodes.iter().find(|n| n.id == hit.id).map(FocusSelection::for_node)
}

/// Drops a focus id that no longer names a node.
pub fn retain_focus(focus: Option<String>, nodes: &[Node]) -> Option<String> {
	focus.filter(|id| nodes.iter().any(|n| &n.id == id))
}

/// Remote hits worth listing: focusable in the current graph and not already
/// among the local matches.
pub fn remote_suggestions(nodes: &[Node], local: &[FocusSelection], hits: &[SearchHit]) -> Vec<SearchHit> {
	hits.iter()
		.filter(|hit| !local.iter().any(|l| l.node_id == hit.id))
		.filter(|hit| select_hit(nodes, hit).is_some())
		.cloned()
		.collect()
}

/// What a finished remote search does to the listed hits. `None` leaves them
/// alone because a newer query has been issued; a failure of the current
/// query clears them.
pub fn settle_search<E>(is_current: bool, result: Result<SearchResponse, E>) -> Option<Vec<SearchHit>> {
	if !is_current {
		return None;
	}
	Some(result.map(|resp| resp.results).unwrap_or_default())
}
