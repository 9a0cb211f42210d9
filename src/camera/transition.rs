use super::CameraPose;

/// Seconds a fit or focus move takes.
pub const DEFAULT_DURATION: f64 = 0.8;

pub fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Eased move between two poses, advanced once per animation frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraTransition {
	from: CameraPose,
	to: CameraPose,
	elapsed: f64,
	duration: f64,
}

impl CameraTransition {
	pub fn new(from: CameraPose, to: CameraPose, duration: f64) -> Self {
		Self {
			from,
			to,
			elapsed: 0.0,
			duration: duration.max(0.0),
		}
	}

	pub fn target(&self) -> &CameraPose {
		&self.to
	}

	pub fn progress(&self) -> f64 {
		if self.duration <= 0.0 {
			1.0
		} else {
			(self.elapsed / self.duration).clamp(0.0, 1.0)
		}
	}

	pub fn is_finished(&self) -> bool {
		self.progress() >= 1.0
	}

	/// Pose at the current progress.
	pub fn sample(&self) -> CameraPose {
		let t = self.progress();
		let e = ease_out_cubic(t);
		CameraPose {
			position: self.from.position.lerp(self.to.position, e),
			look_at: self.from.look_at.lerp(self.to.look_at, e),
			near: self.from.near + (self.to.near - self.from.near) * t,
			far: self.from.far + (self.to.far - self.from.far) * t,
		}
	}

	/// Steps the clock and returns the new pose.
	pub fn advance(&mut self, dt: f64) -> CameraPose {
		self.elapsed += dt.max(0.0);
		self.sample()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use glam::DVec3;

	fn pose(x: f64) -> CameraPose {
		CameraPose {
			position: DVec3::new(x, 0.0, 10.0),
			look_at: DVec3::new(x, 0.0, 0.0),
			near: 0.1,
			far: 50.0 + x,
		}
	}

	#[test]
	fn endpoints_are_exact() {
		let mut t = CameraTransition::new(pose(0.0), pose(10.0), 1.0);
		assert_eq!(t.sample(), pose(0.0));
		assert!(!t.is_finished());
		t.advance(0.5);
		t.advance(0.75);
		assert!(t.is_finished());
		assert_eq!(t.sample(), pose(10.0));
	}

	#[test]
	fn eases_out() {
		let mut t = CameraTransition::new(pose(0.0), pose(10.0), 1.0);
		let mid = t.advance(0.5);
		// Ease-out covers more than half the distance at half time.
		assert!(mid.position.x > 5.0 && mid.position.x < 10.0);
		assert!((mid.far - 55.0).abs() < 1e-9);
	}

	#[test]
	fn zero_duration_jumps() {
		let t = CameraTransition::new(pose(0.0), pose(3.0), 0.0);
		assert!(t.is_finished());
		assert_eq!(t.sample(), pose(3.0));
	}
}
