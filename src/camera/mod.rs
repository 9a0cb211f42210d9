//! Camera framing.
//!
//! Both framing operations take the previous pose and return a new one. The
//! viewing direction is carried over from the previous pose rather than reset,
//! so the result depends on camera history, not just the graph.
//!
//! - [`fit_camera`] keeps the current viewing angle and backs off until the
//!   whole bounding sphere is in view.
//! - [`focus_camera`] dives toward one node from wherever the camera is now.

pub mod orbit;
pub mod projection;
pub mod transition;

use glam::DVec3;

use crate::graph::Node;

pub use orbit::{dolly, orbit};
pub use projection::{Projector, ScreenPoint};
pub use transition::CameraTransition;

/// Axis-aligned approximation of the sphere enclosing all nodes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
	pub center: DVec3,
	pub radius: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
	pub position: DVec3,
	pub look_at: DVec3,
	pub near: f64,
	pub far: f64,
}

impl Default for CameraPose {
	fn default() -> Self {
		Self {
			position: DVec3::new(0.0, 0.0, 8.0),
			look_at: DVec3::ZERO,
			near: 0.1,
			far: 2000.0,
		}
	}
}

impl CameraPose {
	/// Unit vector from the look-at target back to the camera, if the two are
	/// distinct.
	pub fn back_direction(&self) -> Option<DVec3> {
		(self.position - self.look_at).try_normalize()
	}

	pub fn distance(&self) -> f64 {
		self.position.distance(self.look_at)
	}
}

/// Framing constants.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
	/// Vertical field of view in degrees.
	pub fov_degrees: f64,
	pub fit_distance_multiplier: f64,
	pub fit_min_distance: f64,
	pub near_plane_ratio: f64,
	pub far_plane_ratio: f64,
	pub min_near_plane: f64,
	pub min_far_plane: f64,
	/// Radius used when a scene collapses to a point.
	pub min_radius: f64,
	pub focus_distance_multiplier: f64,
	pub focus_min_distance: f64,
	pub focus_near_plane_ratio: f64,
	/// Radius hint for focus when no fit has happened yet.
	pub focus_default_hint: f64,
	/// Direction used when the previous pose has none.
	pub canonical_direction: DVec3,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			fov_degrees: 45.0,
			fit_distance_multiplier: 2.5,
			fit_min_distance: 6.0,
			near_plane_ratio: 100.0,
			far_plane_ratio: 10.0,
			min_near_plane: 0.1,
			min_far_plane: 50.0,
			min_radius: 1.0,
			focus_distance_multiplier: 0.3,
			focus_min_distance: 3.0,
			focus_near_plane_ratio: 50.0,
			focus_default_hint: 3.0,
			canonical_direction: DVec3::Z,
		}
	}
}

/// Bounding sphere of the node positions, or `None` for an empty set.
pub fn compute_bounding_sphere(nodes: &[Node]) -> Option<BoundingSphere> {
	compute_bounding_sphere_with(nodes, &CameraConfig::default())
}

pub fn compute_bounding_sphere_with(nodes: &[Node], config: &CameraConfig) -> Option<BoundingSphere> {
	let first = nodes.first()?.position;
	let (lo, hi) = nodes
		.iter()
		.fold((first, first), |(lo, hi), n| (lo.min(n.position), hi.max(n.position)));

	let span = hi - lo;
	Some(BoundingSphere {
		center: lo.lerp(hi, 0.5),
		radius: (span.max_element() / 2.0).max(config.min_radius),
	})
}

/// Frames the whole sphere while keeping the current viewing direction.
pub fn fit_camera(current: &CameraPose, sphere: &BoundingSphere, config: &CameraConfig) -> CameraPose {
	let direction = current.back_direction().unwrap_or(config.canonical_direction);
	let distance = (sphere.radius * config.fit_distance_multiplier).max(config.fit_min_distance);

	CameraPose {
		position: sphere.center + direction * distance,
		look_at: sphere.center,
		near: (distance / config.near_plane_ratio).max(config.min_near_plane),
		far: (distance * config.far_plane_ratio).max(config.min_far_plane),
	}
}

/// Close-up on `target`, approached along the line from the current camera
/// position. `radius_hint` is the last fit radius.
pub fn focus_camera(current: &CameraPose, target: &Node, radius_hint: Option<f64>, config: &CameraConfig) -> CameraPose {
	let target_pos = target.position;
	let direction = (current.position - target_pos)
		.try_normalize()
		.unwrap_or(config.canonical_direction);
	let hint = radius_hint.unwrap_or(config.focus_default_hint);
	let distance = (hint * config.focus_distance_multiplier).max(config.focus_min_distance);

	CameraPose {
		position: target_pos + direction * distance,
		look_at: target_pos,
		near: (distance / config.focus_near_plane_ratio).max(config.min_near_plane),
		far: (distance * config.far_plane_ratio).max(config.min_far_plane),
	}
}
