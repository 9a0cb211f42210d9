//! Normalises untrusted `{ nodes, edges }` payloads into [`GraphData`].
//!
//! Hydration never fails. Malformed input degrades to an empty or partial
//! graph; missing labels, ids and positions get fallbacks.

use std::collections::{BTreeMap, HashSet};

use glam::DVec3;
use log::debug;
use rand::Rng;
use serde_json::{Map, Value};

use super::types::{Edge, GraphData, Node, NodeData};

/// Placeholder labels for nodes that arrive without any usable name.
pub const PLACEHOLDER_NAMES: &[&str] = &[
	"NVIDIA",
	"Tesla",
	"Apple",
	"Microsoft",
	"Amazon",
	"Google",
	"Meta",
	"AMD",
	"Intel",
	"Netflix",
	"Adobe",
	"Salesforce",
	"Samsung",
	"Qualcomm",
	"Spotify",
	"Uber",
	"Airbnb",
	"IBM",
	"Oracle",
	"Stripe",
	"Shopify",
	"ByteDance",
	"Tencent",
	"Alibaba",
	"TSMC",
	"Unity",
	"Roblox",
	"Zoom",
];

/// Divisor from payload (pixel-ish) coordinates into simulation units.
pub const POSITION_SCALE: f64 = 120.0;

/// Multiplier on `cbrt(node_count)` for the random placement cube.
pub const INITIAL_SCALE_MULTIPLIER: f64 = 6.0;

/// Hydrates a raw payload. Anything that is not an object with list-valued
/// `nodes`/`edges` yields an empty graph for that part.
pub fn hydrate<R: Rng + ?Sized>(raw: &Value, rng: &mut R) -> GraphData {
	let raw_nodes = raw
		.get("nodes")
		.and_then(Value::as_array)
		.map(Vec::as_slice)
		.unwrap_or_default();
	let raw_edges = raw
		.get("edges")
		.and_then(Value::as_array)
		.map(Vec::as_slice)
		.unwrap_or_default();

	let total = raw_nodes.len();
	let mut seen = HashSet::with_capacity(total);
	let mut nodes = Vec::with_capacity(total);
	for (i, raw_node) in raw_nodes.iter().enumerate() {
		let node = hydrate_node(raw_node, i, total, rng);
		if seen.insert(node.id.clone()) {
			nodes.push(node);
		} else {
			debug!("dropping node with duplicate id {}", node.id);
		}
	}

	// Explicit edge ids are reserved up front so a synthetic `edge-{i}` never
	// takes one that appears later in the payload.
	let explicit: HashSet<String> = raw_edges
		.iter()
		.filter_map(|e| e.get("id").and_then(coerce_id))
		.collect();
	let mut edge_ids = HashSet::with_capacity(raw_edges.len());
	let (mut dangling, mut duplicates) = (0usize, 0usize);
	let mut edges = Vec::with_capacity(raw_edges.len());
	for (i, raw_edge) in raw_edges.iter().enumerate() {
		let Some(mut edge) = hydrate_edge(raw_edge, i) else {
			continue;
		};
		if !seen.contains(&edge.source) || !seen.contains(&edge.target) {
			dangling += 1;
			continue;
		}
		if raw_edge.get("id").and_then(coerce_id).is_none() {
			edge.id = unique_id(edge.id, |id| explicit.contains(id) || edge_ids.contains(id));
		}
		if !edge_ids.insert(edge.id.clone()) {
			duplicates += 1;
			continue;
		}
		edges.push(edge);
	}

	if edges.len() < raw_edges.len() {
		debug!(
			"hydrated {} of {} edges ({} with unknown endpoints, {} duplicate ids)",
			edges.len(),
			raw_edges.len(),
			dangling,
			duplicates
		);
	}

	GraphData { nodes, edges }
}

/// Hydrates a single node. `index` drives the synthetic id and placeholder
/// label, `total` sizes the random placement cube.
pub fn hydrate_node<R: Rng + ?Sized>(raw: &Value, index: usize, total: usize, rng: &mut R) -> Node {
	let empty = Map::new();
	let obj = raw.as_object().unwrap_or(&empty);
	let nested = obj.get("data").and_then(Value::as_object).unwrap_or(&empty);

	let id = obj
		.get("id")
		.and_then(coerce_id)
		.unwrap_or_else(|| format!("node-{index}"));

	let label = [
		obj.get("label"),
		nested.get("label"),
		nested.get("name"),
		obj.get("name"),
	]
	.into_iter()
	.flatten()
	.filter_map(Value::as_str)
	.find(|s| !s.trim().is_empty())
	.map(str::to_owned)
	.unwrap_or_else(|| placeholder_name(index).to_owned());

	let description = obj
		.get("description")
		.and_then(Value::as_str)
		.or_else(|| nested.get("description").and_then(Value::as_str))
		.map(str::to_owned)
		.unwrap_or_else(|| format!("{label} is a key company within the network."));

	let color = obj
		.get("color")
		.and_then(Value::as_str)
		.or_else(|| nested.get("color").and_then(Value::as_str))
		.map(str::to_owned);

	let position = obj
		.get("position")
		.and_then(Value::as_object)
		.and_then(normalize_position)
		.or_else(|| normalize_position(obj))
		.unwrap_or_else(|| random_position(initial_extent(total), rng));

	let attributes: BTreeMap<String, Value> = nested
		.iter()
		.filter(|(key, value)| {
			!matches!(key.as_str(), "label" | "description") && is_scalar(value)
		})
		.map(|(key, value)| (key.clone(), value.clone()))
		.collect();

	Node {
		id,
		position,
		color,
		data: NodeData {
			label,
			description,
			attributes,
		},
	}
}

/// Hydrates a single edge, or `None` when either endpoint is missing.
pub fn hydrate_edge(raw: &Value, index: usize) -> Option<Edge> {
	let obj = raw.as_object()?;
	let source = obj.get("source").and_then(coerce_id)?;
	let target = obj.get("target").and_then(coerce_id)?;

	let strength = obj
		.get("strength")
		.and_then(Value::as_f64)
		.filter(|s| s.is_finite())
		.map(|s| s.clamp(0.0, 1.0));

	Some(Edge {
		id: obj
			.get("id")
			.and_then(coerce_id)
			.unwrap_or_else(|| format!("edge-{index}")),
		source,
		target,
		strength,
	})
}

pub fn placeholder_name(index: usize) -> &'static str {
	PLACEHOLDER_NAMES[index % PLACEHOLDER_NAMES.len()]
}

/// Edge length of the random placement cube for `count` nodes.
pub fn initial_extent(count: usize) -> f64 {
	((count as f64).cbrt() * INITIAL_SCALE_MULTIPLIER).max(2.0)
}

/// Uniform point in the cube of edge length `extent` centred on the origin.
pub fn random_position<R: Rng + ?Sized>(extent: f64, rng: &mut R) -> DVec3 {
	let half = extent / 2.0;
	DVec3::new(
		rng.gen_range(-half..=half),
		rng.gen_range(-half..=half),
		rng.gen_range(-half..=half),
	)
}

/// Reads `x|left`, `y|top`, `z` from `obj`. Returns `None` when none of them
/// is a finite number; missing axes default to zero.
fn normalize_position(obj: &Map<String, Value>) -> Option<DVec3> {
	let axis = |primary: &str, alias: Option<&str>| {
		obj.get(primary)
			.or_else(|| alias.and_then(|a| obj.get(a)))
			.and_then(Value::as_f64)
			.filter(|v| v.is_finite())
	};
	let (x, y, z) = (axis("x", Some("left")), axis("y", Some("top")), axis("z", None));
	if x.is_none() && y.is_none() && z.is_none() {
		return None;
	}
	Some(DVec3::new(
		x.unwrap_or(0.0) / POSITION_SCALE,
		y.unwrap_or(0.0) / POSITION_SCALE,
		z.unwrap_or(0.0) / POSITION_SCALE,
	))
}

fn coerce_id(value: &Value) -> Option<String> {
	match value {
		Value::String(s) if !s.is_empty() => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

/// `base`, or `base-1`, `base-2`, ... whichever is first not taken.
fn unique_id(base: String, taken: impl Fn(&str) -> bool) -> String {
	if !taken(&base) {
		return base;
	}
	let mut n = 1usize;
	loop {
		let candidate = format!("{base}-{n}");
		if !taken(&candidate) {
			return candidate;
		}
		n += 1;
	}
}

fn is_scalar(value: &Value) -> bool {
	!matches!(value, Value::Array(_) | Value::Object(_))
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use serde_json::json;

	use super::*;

	fn rng() -> StdRng {
		StdRng::seed_from_u64(7)
	}

	#[test]
	fn malformed_payload_yields_empty_graph() {
		for raw in [json!(null), json!(42), json!("nodes"), json!({"nodes": {}, "edges": 3})] {
			let g = hydrate(&raw, &mut rng());
			assert!(g.nodes.is_empty());
			assert!(g.edges.is_empty());
		}
	}

	#[test]
	fn well_formed_input_is_deterministic() {
		let raw = json!({
			"nodes": [
				{"id": "A", "label": "Alpha", "position": {"x": 120, "y": -240, "z": 60}},
				{"id": "B", "label": "Beta", "position": {"left": 240, "top": 0}},
			],
			"edges": [{"id": "e1", "source": "A", "target": "B", "strength": 0.4}],
		});
		let first = hydrate(&raw, &mut StdRng::seed_from_u64(1));
		let second = hydrate(&raw, &mut StdRng::seed_from_u64(99));
		assert_eq!(first, second);
		assert_eq!(first.nodes[0].position, DVec3::new(1.0, -2.0, 0.5));
		assert_eq!(first.nodes[1].position, DVec3::new(2.0, 0.0, 0.0));
	}

	#[test]
	fn edges_with_unknown_endpoints_are_dropped() {
		let raw = json!({
			"nodes": [{"id": "A"}, {"id": "B"}],
			"edges": [{"source": "A", "target": "B"}, {"source": "X", "target": "Y"}],
		});
		let g = hydrate(&raw, &mut rng());
		assert_eq!(g.edges.len(), 1);
		assert_eq!(g.edges[0].source, "A");
		assert_eq!(g.edges[0].target, "B");
		assert_eq!(g.edges[0].id, "edge-0");
	}

	#[test]
	fn edges_without_endpoints_are_dropped() {
		let raw = json!({
			"nodes": [{"id": "A"}, {"id": "B"}],
			"edges": [{"source": "A"}, {"target": "B"}, {"source": "", "target": "B"}, "junk"],
		});
		assert!(hydrate(&raw, &mut rng()).edges.is_empty());
	}

	#[test]
	fn strength_is_clamped() {
		let strength = |s: Value| hydrate_edge(&json!({"source": "a", "target": "b", "strength": s}), 0).unwrap().strength;
		assert_eq!(strength(json!(5)), Some(1.0));
		assert_eq!(strength(json!(-2)), Some(0.0));
		assert_eq!(strength(json!(0.4)), Some(0.4));
		assert_eq!(strength(json!("0.4")), None);
		assert_eq!(strength(json!(null)), None);
	}

	#[test]
	fn label_precedence() {
		let node = |raw: Value| hydrate_node(&raw, 3, 10, &mut rng());
		assert_eq!(node(json!({"label": "Top", "data": {"label": "Nested", "name": "N"}, "name": "Name"})).data.label, "Top");
		assert_eq!(node(json!({"label": " ", "data": {"label": "Nested", "name": "N"}})).data.label, "Nested");
		assert_eq!(node(json!({"data": {"name": "N"}, "name": "Name"})).data.label, "N");
		assert_eq!(node(json!({"name": "Name"})).data.label, "Name");
		assert_eq!(node(json!({})).data.label, "Microsoft");
		assert_eq!(hydrate_node(&json!({}), 28, 30, &mut rng()).data.label, "NVIDIA");
	}

	#[test]
	fn fallbacks_for_id_description_and_color() {
		let n = hydrate_node(&json!({"data": {"color": "#fff", "sector": "AI", "tags": ["x"]}}), 5, 6, &mut rng());
		assert_eq!(n.id, "node-5");
		assert_eq!(n.color.as_deref(), Some("#fff"));
		assert_eq!(n.data.description, "Google is a key company within the network.");
		assert_eq!(n.data.attribute_str("sector"), Some("AI"));
		assert!(!n.data.attributes.contains_key("tags"));

		let numeric = hydrate_node(&json!({"id": 17, "color": "#000", "description": "Custom"}), 0, 1, &mut rng());
		assert_eq!(numeric.id, "17");
		assert_eq!(numeric.color.as_deref(), Some("#000"));
		assert_eq!(numeric.data.description, "Custom");
	}

	#[test]
	fn missing_position_lands_inside_the_cube() {
		let count = 64;
		let half = initial_extent(count) / 2.0;
		assert!((half - 12.0).abs() < 1e-9);
		let mut r = rng();
		for i in 0..count {
			let p = hydrate_node(&json!({"id": i}), i, count, &mut r).position;
			assert!(p.is_finite());
			assert!(p.x.abs() <= half && p.y.abs() <= half && p.z.abs() <= half);
		}
		assert!((initial_extent(1) - 6.0).abs() < 1e-9);
		assert_eq!(initial_extent(0), 2.0);
	}

	#[test]
	fn duplicate_ids_keep_first() {
		let raw = json!({"nodes": [{"id": "A", "label": "first"}, {"id": "A", "label": "second"}], "edges": []});
		let g = hydrate(&raw, &mut rng());
		assert_eq!(g.nodes.len(), 1);
		assert_eq!(g.nodes[0].data.label, "first");
	}

	#[test]
	fn edge_ids_are_unique() {
		let raw = json!({
			"nodes": [{"id": "A"}, {"id": "B"}],
			"edges": [
				{"id": "edge-1", "source": "A", "target": "B"},
				{"source": "B", "target": "A"},
				{"id": "dup", "source": "A", "target": "B"},
				{"id": "dup", "source": "B", "target": "A"},
				{"source": "A", "target": "B"},
				{"id": "edge-4", "source": "B", "target": "A"},
			]
		});
		let g = hydrate(&raw, &mut rng());
		let ids: Vec<&str> = g.edges.iter().map(|e| e.id.as_str()).collect();
		assert_eq!(ids, ["edge-1", "edge-1-1", "dup", "edge-4-1", "edge-4"]);
		let unique: HashSet<&str> = ids.iter().copied().collect();
		assert_eq!(unique.len(), ids.len());
	}

	#[test]
	fn fallback_positions_follow_the_rng() {
		let raw = json!({"nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}], "edges": []});
		let a = hydrate(&raw, &mut StdRng::seed_from_u64(1));
		let b = hydrate(&raw, &mut StdRng::seed_from_u64(2));
		let again = hydrate(&raw, &mut StdRng::seed_from_u64(1));
		for ((x, y), z) in a.nodes.iter().zip(&b.nodes).zip(&again.nodes) {
			assert_ne!(x.position, y.position);
			assert_eq!(x.position, z.position);
		}
	}
}
