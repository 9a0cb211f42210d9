use glam::DVec3;

use super::CameraPose;

/// A world point after perspective projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
	pub x: f64,
	pub y: f64,
	/// Distance along the view axis.
	pub depth: f64,
	/// Pixels per world unit at this depth.
	pub scale: f64,
}

/// Pinhole projection for one camera pose and viewport size.
#[derive(Clone, Debug)]
pub struct Projector {
	eye: DVec3,
	forward: DVec3,
	right: DVec3,
	up: DVec3,
	focal: f64,
	center_x: f64,
	center_y: f64,
	near: f64,
	far: f64,
}

impl Projector {
	/// `None` when the camera sits on its own target.
	pub fn new(pose: &CameraPose, width: f64, height: f64, fov_degrees: f64) -> Option<Self> {
		let forward = (pose.look_at - pose.position).try_normalize()?;
		let right = forward
			.cross(DVec3::Y)
			.try_normalize()
			.or_else(|| forward.cross(DVec3::Z).try_normalize())?;
		let up = right.cross(forward);
		let focal = (height / 2.0) / (fov_degrees.to_radians() / 2.0).tan();

		Some(Self {
			eye: pose.position,
			forward,
			right,
			up,
			focal,
			center_x: width / 2.0,
			center_y: height / 2.0,
			near: pose.near,
			far: pose.far,
		})
	}

	/// Projects `p`, or `None` when it falls outside the clip range.
	pub fn project(&self, p: DVec3) -> Option<ScreenPoint> {
		let rel = p - self.eye;
		let depth = rel.dot(self.forward);
		if depth < self.near || depth > self.far {
			return None;
		}
		let scale = self.focal / depth;
		Some(ScreenPoint {
			x: self.center_x + rel.dot(self.right) * scale,
			y: self.center_y - rel.dot(self.up) * scale,
			depth,
			scale,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn projector() -> Projector {
		Projector::new(&CameraPose::default(), 800.0, 600.0, 90.0).unwrap()
	}

	#[test]
	fn target_lands_mid_screen() {
		let p = projector().project(DVec3::ZERO).unwrap();
		assert!((p.x - 400.0).abs() < 1e-9);
		assert!((p.y - 300.0).abs() < 1e-9);
		assert!((p.depth - 8.0).abs() < 1e-9);
	}

	#[test]
	fn axes_map_to_screen_directions() {
		let proj = projector();
		let right = proj.project(DVec3::new(1.0, 0.0, 0.0)).unwrap();
		let up = proj.project(DVec3::new(0.0, 1.0, 0.0)).unwrap();
		assert!(right.x > 400.0);
		assert!(up.y < 300.0);
		// focal = 300 px at 90°, so one unit at depth 8 is 37.5 px.
		assert!((right.x - 437.5).abs() < 1e-9);
		assert!((right.scale - 37.5).abs() < 1e-9);
	}

	#[test]
	fn points_behind_are_culled() {
		assert!(projector().project(DVec3::new(0.0, 0.0, 9.0)).is_none());
	}

	#[test]
	fn looking_straight_down_still_projects() {
		let pose = CameraPose {
			position: DVec3::new(0.0, 10.0, 0.0),
			..CameraPose::default()
		};
		let proj = Projector::new(&pose, 100.0, 100.0, 45.0).unwrap();
		assert!(proj.project(DVec3::ZERO).is_some());
		let collapsed = CameraPose {
			position: DVec3::ZERO,
			..CameraPose::default()
		};
		assert!(Projector::new(&collapsed, 100.0, 100.0, 45.0).is_none());
	}
}
