use std::collections::BTreeMap;

use rand::Rng;
use serde_json::Value;

use super::hydrate::{initial_extent, placeholder_name, random_position};
use super::types::{Edge, GraphData, Node, NodeData};
use crate::layout::{SAMPLE_ITERATIONS, layout};

pub const SAMPLE_NODE_COUNT: usize = 18;

const PALETTE: &[&str] = &["#667eea", "#764ba2", "#f093fb", "#4f46e5", "#22d3ee", "#f472b6"];
const SECTORS: &[&str] = &["AI", "Automotive", "Consumer", "Enterprise", "Cloud", "Semiconductors"];

/// Synthetic company network: a ring plus a chord to the node a third of the
/// way around. Already laid out.
pub fn generate_sample_graph<R: Rng + ?Sized>(count: usize, rng: &mut R) -> GraphData {
	let nodes: Vec<Node> = (0..count)
		.map(|i| {
			let color = PALETTE[i % PALETTE.len()];
			let label = placeholder_name(i);
			let sector = SECTORS[i % SECTORS.len()];
			let market_cap = format!("{:.1}B", rng.gen_range(100.0..1000.0));

			let mut attributes = BTreeMap::new();
			attributes.insert("sector".to_owned(), Value::from(sector));
			attributes.insert("marketCap".to_owned(), Value::from(market_cap));
			attributes.insert("color".to_owned(), Value::from(color));

			Node {
				id: format!("node-{}", i + 1),
				position: random_position(initial_extent(count), rng),
				color: Some(color.to_owned()),
				data: NodeData {
					label: label.to_owned(),
					description: format!(
						"{label} is a leading {} company in our sample network.",
						sector.to_lowercase()
					),
					attributes,
				},
			}
		})
		.collect();

	let mut edges = Vec::with_capacity(count * 2);
	for i in 0..count {
		let next = (i + 1) % count;
		let chord = (i + count / 3) % count;
		edges.push(sample_edge(&nodes, i, next, 0.25));
		if chord != next {
			edges.push(sample_edge(&nodes, i, chord, 0.1));
		}
	}

	let nodes = layout(&nodes, &edges, Some(SAMPLE_ITERATIONS));
	GraphData { nodes, edges }
}

fn sample_edge(nodes: &[Node], from: usize, to: usize, strength: f64) -> Edge {
	Edge {
		id: format!("edge-{from}-{to}"),
		source: nodes[from].id.clone(),
		target: nodes[to].id.clone(),
		strength: Some(strength),
	}
}
