use std::collections::{HashMap, HashSet};

use super::pick::{PickIndex, ScreenDisc};
use crate::camera::transition::DEFAULT_DURATION;
use crate::camera::{
	self, BoundingSphere, CameraConfig, CameraPose, CameraTransition, Projector, ScreenPoint,
};
use crate::graph::{GraphData, Node};

/// World-space sphere radius of a node.
pub const NODE_RADIUS: f64 = 0.4;
/// Extra pick tolerance around a node, in pixels.
pub const HIT_SLOP: f64 = 4.0;
pub const DEFAULT_COLOR: &str = "#667eea";

const HOVER_SCALE: f64 = 1.5;
const HOVER_SPEED: f64 = 0.1;
/// Radians of orbit per dragged pixel.
const ORBIT_SPEED: f64 = 0.006;
/// Pointer travel (px) below which a press counts as a click.
const CLICK_SLOP: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
}

#[derive(Clone, Debug, Default)]
pub struct OrbitDrag {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub last_x: f64,
	pub last_y: f64,
}

impl OrbitDrag {
	fn travelled(&self) -> f64 {
		(self.last_x - self.start_x).hypot(self.last_y - self.start_y)
	}
}

/// Everything the canvas needs between frames.
pub struct SceneState {
	pub nodes: Vec<Node>,
	pub edges: Vec<(usize, usize)>,
	index: HashMap<String, usize>,
	pub camera: CameraPose,
	transition: Option<CameraTransition>,
	pub bounds: Option<BoundingSphere>,
	pub config: CameraConfig,
	focused: Option<String>,
	pub hover: HoverState,
	/// Animated per-node scale, eased toward 1.0 or the hover scale.
	pub scales: Vec<f64>,
	pub drag: OrbitDrag,
	pub width: f64,
	pub height: f64,
	/// Hit-test index, rebuilt on the first query after the view changes.
	pick: PickIndex,
	pick_dirty: bool,
}

impl SceneState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Self {
		let mut state = Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			index: HashMap::new(),
			camera: CameraPose::default(),
			transition: None,
			bounds: None,
			config: CameraConfig::default(),
			focused: None,
			hover: HoverState::default(),
			scales: Vec::new(),
			drag: OrbitDrag::default(),
			width,
			height,
			pick: PickIndex::default(),
			pick_dirty: true,
		};
		state.set_graph(data);
		state.settle();
		state
	}

	/// Swaps in a new snapshot and reframes it. A focus target that survives
	/// the swap is re-applied after the fit, from the fitted pose.
	pub fn set_graph(&mut self, data: &GraphData) {
		self.nodes = data.nodes.clone();
		self.index = self
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		self.edges = data
			.edges
			.iter()
			.filter_map(|e| Some((*self.index.get(&e.source)?, *self.index.get(&e.target)?)))
			.collect();
		self.scales = vec![1.0; self.nodes.len()];
		self.hover = HoverState::default();
		self.pick_dirty = true;

		self.bounds = camera::compute_bounding_sphere_with(&self.nodes, &self.config);
		let Some(bounds) = self.bounds else {
			self.transition = None;
			return;
		};
		let mut target = camera::fit_camera(&self.camera, &bounds, &self.config);
		if let Some(node) = self.focused.as_ref().and_then(|id| self.index.get(id)).map(|&i| &self.nodes[i]) {
			target = camera::focus_camera(&target, node, Some(bounds.radius), &self.config);
		} else {
			self.focused = None;
		}
		self.start_transition(target);
	}

	/// Moves in on one node. Returns `false` for unknown ids.
	pub fn focus(&mut self, id: &str) -> bool {
		let Some(&idx) = self.index.get(id) else {
			return false;
		};
		let radius = self.bounds.map(|b| b.radius);
		let target = camera::focus_camera(&self.camera, &self.nodes[idx], radius, &self.config);
		self.focused = Some(id.to_owned());
		self.start_transition(target);
		true
	}

	pub fn clear_focus(&mut self) {
		self.focused = None;
	}

	pub fn focused_index(&self) -> Option<usize> {
		self.focused.as_ref().and_then(|id| self.index.get(id)).copied()
	}

	/// Reframes the whole graph from the current viewing direction.
	pub fn fit(&mut self) {
		if let Some(bounds) = self.bounds {
			let target = camera::fit_camera(&self.camera, &bounds, &self.config);
			self.start_transition(target);
		}
	}

	fn start_transition(&mut self, to: CameraPose) {
		self.transition = Some(CameraTransition::new(self.camera, to, DEFAULT_DURATION));
	}

	/// Jumps to the end of any running transition.
	pub fn settle(&mut self) {
		if let Some(t) = self.transition.take() {
			self.camera = *t.target();
			self.pick_dirty = true;
		}
	}

	pub fn node_id(&self, idx: usize) -> Option<&str> {
		self.nodes.get(idx).map(|n| n.id.as_str())
	}

	pub fn projector(&self) -> Option<Projector> {
		Projector::new(&self.camera, self.width, self.height, self.config.fov_degrees)
	}

	pub fn project_nodes(&self) -> Vec<Option<ScreenPoint>> {
		match self.projector() {
			Some(p) => self.nodes.iter().map(|n| p.project(n.position)).collect(),
			None => vec![None; self.nodes.len()],
		}
	}

	/// Nearest node under the pointer, if any.
	pub fn node_at_position(&mut self, sx: f64, sy: f64) -> Option<usize> {
		if self.pick_dirty {
			let discs = self.project_nodes().into_iter().enumerate().filter_map(|(i, p)| {
				let p = p?;
				let reach = NODE_RADIUS * p.scale * self.scales[i] + HIT_SLOP;
				Some(ScreenDisc::new(i, p.x, p.y, reach, p.depth))
			});
			self.pick = PickIndex::build(discs.collect::<Vec<_>>());
			self.pick_dirty = false;
		}
		self.pick.hit(sx, sy)
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		if self.hover.node == node {
			return;
		}
		self.hover.node = node;
		self.hover.neighbors.clear();
		if let Some(idx) = node {
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
	}

	pub fn is_highlighted(&self, idx: usize) -> bool {
		self.hover.node == Some(idx) || self.hover.neighbors.contains(&idx) || self.focused_index() == Some(idx)
	}

	pub fn tick(&mut self, dt: f64) {
		self.pick_dirty = true;
		if let Some(t) = self.transition.as_mut() {
			self.camera = t.advance(dt);
			if t.is_finished() {
				self.transition = None;
			}
		}

		for (i, scale) in self.scales.iter_mut().enumerate() {
			let target = if self.hover.node == Some(i) { HOVER_SCALE } else { 1.0 };
			*scale += (target - *scale) * HOVER_SPEED;
		}

		let target = if self.hover.node.is_some() { 1.0 } else { 0.0 };
		self.hover.highlight_t += (target - self.hover.highlight_t) * 3.0 * dt;
		if self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
		}
	}

	pub fn begin_drag(&mut self, x: f64, y: f64) {
		self.drag = OrbitDrag {
			active: true,
			start_x: x,
			start_y: y,
			last_x: x,
			last_y: y,
		};
	}

	/// Orbits by the pointer delta once the press has moved past the click
	/// threshold. User movement takes over from any running transition.
	pub fn drag_to(&mut self, x: f64, y: f64) {
		if !self.drag.active {
			return;
		}
		let (dx, dy) = (x - self.drag.last_x, y - self.drag.last_y);
		self.drag.last_x = x;
		self.drag.last_y = y;
		if self.drag.travelled() < CLICK_SLOP {
			return;
		}
		self.transition = None;
		self.camera = camera::orbit(&self.camera, -dx * ORBIT_SPEED, dy * ORBIT_SPEED);
		self.pick_dirty = true;
	}

	/// Ends a press. Returns the clicked node when the pointer barely moved.
	pub fn end_drag(&mut self, x: f64, y: f64) -> Option<usize> {
		if !self.drag.active {
			return None;
		}
		self.drag.last_x = x;
		self.drag.last_y = y;
		let clicked = self.drag.travelled() < CLICK_SLOP;
		self.drag.active = false;
		if clicked { self.node_at_position(x, y) } else { None }
	}

	pub fn cancel_drag(&mut self) {
		self.drag.active = false;
		self.set_hover(None);
	}

	pub fn zoom(&mut self, delta_y: f64) {
		self.settle();
		let factor = if delta_y > 0.0 { 1.1 } else { 0.9 };
		self.camera = camera::dolly(&self.camera, factor);
		self.pick_dirty = true;
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.pick_dirty = true;
	}
}

#[cfg(test)]
mod tests {
	use glam::DVec3;

	use super::*;
	use crate::graph::{Edge, NodeData};

	fn graph() -> GraphData {
		let node = |id: &str, p: DVec3| Node {
			id: id.into(),
			position: p,
			color: None,
			data: NodeData::default(),
		};
		GraphData {
			nodes: vec![
				node("a", DVec3::new(-4.0, 0.0, 0.0)),
				node("b", DVec3::new(0.0, 0.0, 0.0)),
				node("c", DVec3::new(4.0, 0.0, 0.0)),
			],
			edges: vec![Edge {
				id: "ab".into(),
				source: "a".into(),
				target: "b".into(),
				strength: None,
			}],
		}
	}

	#[test]
	fn new_scene_is_framed() {
		let s = SceneState::new(&graph(), 800.0, 600.0);
		assert!(s.transition.is_none());
		assert_eq!(s.camera.look_at, DVec3::ZERO);
		assert!((s.camera.distance() - 10.0).abs() < 1e-9);
		assert!(s.project_nodes().iter().all(Option::is_some));
	}

	#[test]
	fn click_picks_the_node_under_the_pointer() {
		let mut s = SceneState::new(&graph(), 800.0, 600.0);
		s.begin_drag(400.0, 300.0);
		assert_eq!(s.end_drag(401.0, 300.0), Some(1));

		s.begin_drag(5.0, 5.0);
		assert_eq!(s.end_drag(5.0, 5.0), None);
	}

	#[test]
	fn dragging_orbits_instead_of_clicking() {
		let mut s = SceneState::new(&graph(), 800.0, 600.0);
		let before = s.camera.position;
		s.begin_drag(400.0, 300.0);
		s.drag_to(450.0, 300.0);
		assert_eq!(s.end_drag(450.0, 300.0), None);
		assert!(s.camera.position.distance(before) > 0.1);
		assert!((s.camera.distance() - 10.0).abs() < 1e-9);
	}

	#[test]
	fn focus_moves_toward_node_and_survives_refresh() {
		let mut s = SceneState::new(&graph(), 800.0, 600.0);
		assert!(!s.focus("missing"));
		assert!(s.focus("c"));
		s.settle();
		assert_eq!(s.camera.look_at, DVec3::new(4.0, 0.0, 0.0));
		assert!((s.camera.distance() - 3.0).abs() < 1e-9);
		assert!(s.is_highlighted(2));

		s.set_graph(&graph());
		s.settle();
		assert_eq!(s.camera.look_at, DVec3::new(4.0, 0.0, 0.0));

		let mut shrunk = graph();
		shrunk.nodes.pop();
		s.set_graph(&shrunk);
		assert_eq!(s.focused_index(), None);
	}

	#[test]
	fn hover_collects_neighbors_and_scales_up() {
		let mut s = SceneState::new(&graph(), 800.0, 600.0);
		s.set_hover(Some(0));
		assert!(s.hover.neighbors.contains(&1));
		assert!(!s.hover.neighbors.contains(&2));
		for _ in 0..100 {
			s.tick(0.016);
		}
		assert!((s.scales[0] - HOVER_SCALE).abs() < 1e-3);
		assert!((s.scales[1] - 1.0).abs() < 1e-9);
	}

	#[test]
	fn hit_testing_follows_the_camera() {
		let mut s = SceneState::new(&graph(), 800.0, 600.0);
		assert_eq!(s.node_at_position(400.0, 300.0), Some(1));
		// Orbiting half a turn puts "a" on the right of the screen.
		s.begin_drag(0.0, 0.0);
		s.drag_to(std::f64::consts::PI / ORBIT_SPEED, 0.0);
		s.end_drag(std::f64::consts::PI / ORBIT_SPEED, 0.0);
		let right = s.project_nodes()[0].map(|p| p.x).unwrap();
		assert!(right > 400.0);
		assert_eq!(s.node_at_position(right, 300.0), Some(0));
	}

	#[test]
	fn empty_graph_skips_framing() {
		let s = SceneState::new(&GraphData::default(), 800.0, 600.0);
		assert!(s.bounds.is_none());
		assert_eq!(s.camera, CameraPose::default());
	}
}
