use std::collections::HashMap;

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::LayoutConfig;
use super::octree::Octree;
use crate::graph::{Edge, Node};

/// Engine-private particle. Indexed by position in the arena, dropped when
/// the run ends.
#[derive(Clone, Copy, Debug)]
struct Particle {
	position: DVec3,
	velocity: DVec3,
}

#[derive(Clone, Copy, Debug)]
struct Link {
	source: usize,
	target: usize,
	strength: f64,
	/// Share of the correction applied to the target (by relative degree).
	bias: f64,
}

pub(super) struct Simulation<'c> {
	particles: Vec<Particle>,
	links: Vec<Link>,
	charge: f64,
	alpha: f64,
	alpha_decay: f64,
	config: &'c LayoutConfig,
	jitter: StdRng,
}

impl<'c> Simulation<'c> {
	pub fn new(nodes: &[Node], edges: &[Edge], config: &'c LayoutConfig) -> Self {
		let mut jitter = StdRng::seed_from_u64(config.seed);
		let index: HashMap<&str, usize> = nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();

		let particles: Vec<Particle> = nodes
			.iter()
			.map(|n| Particle {
				position: if n.position.is_finite() {
					n.position
				} else {
					DVec3::new(jiggle(&mut jitter), jiggle(&mut jitter), jiggle(&mut jitter))
				},
				velocity: DVec3::ZERO,
			})
			.collect();

		let mut degree = vec![0usize; nodes.len()];
		let mut links = Vec::with_capacity(edges.len());
		for edge in edges.iter().filter(|e| !e.is_self_loop()) {
			let (Some(&source), Some(&target)) = (
				index.get(edge.source.as_str()),
				index.get(edge.target.as_str()),
			) else {
				continue;
			};
			degree[source] += 1;
			degree[target] += 1;
			links.push(Link {
				source,
				target,
				strength: edge.strength.unwrap_or(config.default_link_strength),
				bias: 0.0,
			});
		}
		for link in &mut links {
			let (s, t) = (degree[link.source] as f64, degree[link.target] as f64);
			link.bias = s / (s + t);
		}

		Self {
			charge: config.charge_base * (particles.len() as f64).cbrt(),
			particles,
			links,
			alpha: 1.0,
			alpha_decay: 1.0 - config.alpha_min.powf(1.0 / 300.0),
			config,
			jitter,
		}
	}

	pub fn run(&mut self, iterations: usize) {
		for _ in 0..iterations {
			self.tick();
		}
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn positions(&self) -> impl Iterator<Item = DVec3> + '_ {
		self.particles.iter().map(|p| p.position)
	}

	fn tick(&mut self) {
		self.alpha = (self.alpha - self.alpha * self.alpha_decay).max(self.config.alpha_min);

		self.apply_links();
		self.apply_charge();
		self.apply_centering();
		self.apply_collision();
		self.apply_axis_pull();
		self.integrate();
	}

	fn apply_links(&mut self) {
		let (alpha, distance) = (self.alpha, self.config.link_distance);
		for link in &self.links {
			let (s, t) = (self.particles[link.source], self.particles[link.target]);
			let mut d = (t.position + t.velocity) - (s.position + s.velocity);
			jiggle_zeros(&mut d, &mut self.jitter);
			let l = d.length();
			let d = d * ((l - distance) / l * alpha * link.strength);
			self.particles[link.target].velocity -= d * link.bias;
			self.particles[link.source].velocity += d * (1.0 - link.bias);
		}
	}

	/// Many-body repulsion, Barnes–Hut approximated.
	fn apply_charge(&mut self) {
		let n = self.particles.len();
		let positions: Vec<DVec3> = self.positions().collect();
		let weights = vec![self.charge; n];
		let tree = Octree::build(&positions, &weights);
		let theta2 = self.config.theta * self.config.theta;
		let dmin2 = self.config.distance_min * self.config.distance_min;
		let alpha = self.alpha;
		let jitter = &mut self.jitter;

		for (i, &p) in positions.iter().enumerate() {
			let mut dv = DVec3::ZERO;
			tree.visit(|cell| {
				if cell.weight == 0.0 {
					return true;
				}
				let mut d = cell.center - p;
				let l = d.length_squared();
				if cell.size * cell.size / theta2 < l {
					jiggle_zeros(&mut d, jitter);
					dv += d * (cell.weight * alpha / soften(d.length_squared(), dmin2));
					return true;
				}
				if !cell.is_leaf() {
					return false;
				}
				for &j in cell.points.iter().filter(|&&j| j != i) {
					let mut d = positions[j] - p;
					jiggle_zeros(&mut d, jitter);
					dv += d * (weights[j] * alpha / soften(d.length_squared(), dmin2));
				}
				false
			});
			self.particles[i].velocity += dv;
		}
	}

	fn apply_centering(&mut self) {
		let n = self.particles.len() as f64;
		let mut mean = DVec3::ZERO;
		for p in &self.particles {
			mean += p.position;
		}
		let shift = mean * (1.0 / n);
		if !shift.is_finite() {
			return;
		}
		for p in &mut self.particles {
			p.position -= shift;
		}
	}

	/// Pushes overlapping spheres apart using predicted positions.
	fn apply_collision(&mut self) {
		let radius = self.config.collision_radius;
		let reach = radius * 2.0;
		let strength = self.config.collision_strength;
		// Equal radii split the correction evenly.
		let share = (radius * radius) / (radius * radius + radius * radius);
		let predicted: Vec<DVec3> = self
			.particles
			.iter()
			.map(|p| p.position + p.velocity)
			.collect();
		let tree = Octree::build(&predicted, &[]);
		let particles = &mut self.particles;
		let jitter = &mut self.jitter;

		for i in 0..particles.len() {
			let xi = particles[i].position + particles[i].velocity;
			tree.visit(|cell| {
				if cell.is_leaf() {
					for &j in cell.points.iter().filter(|&&j| j > i) {
						let mut d = xi - (particles[j].position + particles[j].velocity);
						if d.length_squared() >= reach * reach {
							continue;
						}
						jiggle_zeros(&mut d, jitter);
						let l = d.length();
						let d = d * ((reach - l) / l * strength);
						particles[i].velocity += d * share;
						particles[j].velocity -= d * (1.0 - share);
					}
					return false;
				}
				let (lo, hi) = (cell.min, cell.max());
				lo.x > xi.x + reach
					|| lo.y > xi.y + reach
					|| lo.z > xi.z + reach
					|| hi.x < xi.x - reach
					|| hi.y < xi.y - reach
					|| hi.z < xi.z - reach
			});
		}
	}

	fn apply_axis_pull(&mut self) {
		let k = self.config.axis_strength * self.alpha;
		for p in &mut self.particles {
			p.velocity -= p.position * k;
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.config.velocity_decay;
		for p in &mut self.particles {
			let velocity = p.velocity * keep;
			let next = p.position + velocity;
			if velocity.is_finite() && next.is_finite() {
				p.velocity = velocity;
				p.position = next;
			} else {
				p.velocity = DVec3::ZERO;
			}
		}
	}
}

/// Caps the inverse-distance falloff for very close pairs.
fn soften(l: f64, dmin2: f64) -> f64 {
	if l < dmin2 { (dmin2 * l).sqrt() } else { l }
}

fn jiggle<R: Rng + ?Sized>(rng: &mut R) -> f64 {
	let j = rng.gen_range(-0.5e-6..0.5e-6);
	if j == 0.0 { 1e-7 } else { j }
}

/// Replaces exact-zero components so distances are never zero.
fn jiggle_zeros<R: Rng + ?Sized>(d: &mut DVec3, rng: &mut R) {
	if d.x == 0.0 {
		d.x = jiggle(rng);
	}
	if d.y == 0.0 {
		d.y = jiggle(rng);
	}
	if d.z == 0.0 {
		d.z = jiggle(rng);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::NodeData;

	fn node(id: &str, p: DVec3) -> Node {
		Node {
			id: id.into(),
			position: p,
			color: None,
			data: NodeData::default(),
		}
	}

	fn edge(s: &str, t: &str) -> Edge {
		Edge {
			id: format!("{s}-{t}"),
			source: s.into(),
			target: t.into(),
			strength: None,
		}
	}

	#[test]
	fn alpha_cools_to_the_floor() {
		let config = LayoutConfig::default();
		let nodes = [node("a", DVec3::ZERO), node("b", DVec3::new(1.0, 0.0, 0.0))];
		let mut sim = Simulation::new(&nodes, &[edge("a", "b")], &config);
		sim.run(300);
		assert!((sim.alpha() - config.alpha_min).abs() < 1e-6);
		sim.run(100);
		assert_eq!(sim.alpha(), config.alpha_min);
	}

	#[test]
	fn self_loops_and_dangling_edges_are_ignored() {
		let config = LayoutConfig::default();
		let nodes = [node("a", DVec3::ZERO), node("b", DVec3::new(1.0, 0.0, 0.0))];
		let sim = Simulation::new(&nodes, &[edge("a", "a"), edge("a", "zz"), edge("a", "b")], &config);
		assert_eq!(sim.links.len(), 1);
		assert!((sim.links[0].bias - 0.5).abs() < 1e-12);
	}

	#[test]
	fn stretched_link_contracts() {
		let config = LayoutConfig {
			charge_base: 0.0,
			axis_strength: 0.0,
			..LayoutConfig::default()
		};
		let nodes = [node("a", DVec3::new(-5.0, 0.0, 0.0)), node("b", DVec3::new(5.0, 0.0, 0.0))];
		let mut sim = Simulation::new(&nodes, &[edge("a", "b")], &config);
		sim.run(300);
		let p: Vec<DVec3> = sim.positions().collect();
		let d = p[0].distance(p[1]);
		assert!(d < 10.0 && d > config.link_distance * 0.5, "distance {d}");
	}

	#[test]
	fn coincident_particles_separate() {
		let config = LayoutConfig::default();
		let at = DVec3::new(0.5, 0.5, 0.5);
		let nodes = [node("a", at), node("b", at), node("c", at)];
		let mut sim = Simulation::new(&nodes, &[edge("a", "b")], &config);
		sim.run(50);
		let p: Vec<DVec3> = sim.positions().collect();
		assert!(p.iter().all(|v| v.is_finite()));
		assert!(p[0].distance(p[1]) > 0.1);
		assert!(p[1].distance(p[2]) > 0.1);
	}
}
