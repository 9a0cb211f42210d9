//! Force-directed 3D layout.
//!
//! A fixed number of ticks of a damped-velocity particle simulation with five
//! forces: link springs, Barnes–Hut many-body repulsion, centroid centering,
//! sphere collision and a weak per-axis pull toward the origin. There is no
//! convergence check; every run does exactly `iterations` ticks and then
//! hands back fresh nodes.

mod octree;
mod simulation;

use log::debug;

use crate::graph::{Edge, Node};
use simulation::Simulation;

/// Ticks used for interactive updates.
pub const DEFAULT_ITERATIONS: usize = 300;
/// Ticks used for the synthetic sample dataset.
pub const SAMPLE_ITERATIONS: usize = 400;

/// Tuned force constants. Changing these changes the look of every graph.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub iterations: usize,
	/// Rest length of a link spring.
	pub link_distance: f64,
	/// Spring strength for edges without their own.
	pub default_link_strength: f64,
	/// Many-body strength is `charge_base * cbrt(node_count)`.
	pub charge_base: f64,
	/// Barnes–Hut opening angle.
	pub theta: f64,
	/// Pairs closer than this have their repulsion capped.
	pub distance_min: f64,
	pub collision_radius: f64,
	pub collision_strength: f64,
	/// Per-axis pull toward zero.
	pub axis_strength: f64,
	pub alpha_min: f64,
	pub velocity_decay: f64,
	/// Seed for the jitter applied to coincident particles.
	pub seed: u64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			iterations: DEFAULT_ITERATIONS,
			link_distance: 1.8,
			default_link_strength: 0.15,
			charge_base: -12.0,
			theta: 0.9,
			distance_min: 1.0,
			collision_radius: 0.85,
			collision_strength: 0.95,
			axis_strength: 0.02,
			alpha_min: 0.001,
			velocity_decay: 0.4,
			seed: 0x5eed,
		}
	}
}

/// Lays out `nodes` with the default constants. `iterations` falls back to
/// [`DEFAULT_ITERATIONS`].
pub fn layout(nodes: &[Node], edges: &[Edge], iterations: Option<usize>) -> Vec<Node> {
	let config = LayoutConfig {
		iterations: iterations.unwrap_or(DEFAULT_ITERATIONS),
		..LayoutConfig::default()
	};
	layout_with_config(nodes, edges, &config)
}

/// Runs the simulation and returns new nodes carrying the settled positions.
/// The input is never modified.
///
/// With no edges, or fewer than two nodes, the nodes come back unchanged.
pub fn layout_with_config(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Vec<Node> {
	if nodes.len() < 2 || edges.is_empty() {
		return nodes.to_vec();
	}

	let mut sim = Simulation::new(nodes, edges, config);
	sim.run(config.iterations);
	debug!(
		"layout: {} nodes, {} edges, {} ticks, alpha {:.4}",
		nodes.len(),
		edges.len(),
		config.iterations,
		sim.alpha()
	);

	nodes
		.iter()
		.zip(sim.positions())
		.map(|(node, position)| Node {
			position: if position.is_finite() {
				position
			} else {
				node.position
			},
			..node.clone()
		})
		.collect()
}
