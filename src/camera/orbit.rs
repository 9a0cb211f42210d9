//! Orbit-control moves. These change the camera direction that the next
//! fit will preserve.

use glam::DVec3;

use super::CameraPose;

const MAX_PITCH: f64 = 1.5;
pub const MIN_DISTANCE: f64 = 1.0;
pub const MAX_DISTANCE: f64 = 500.0;

/// Rotates the camera around its look-at target. `yaw` turns around the
/// world up axis, `pitch` tilts toward it; both in radians.
pub fn orbit(pose: &CameraPose, yaw: f64, pitch: f64) -> CameraPose {
	let offset = pose.position - pose.look_at;
	let radius = offset.length();
	if radius == 0.0 || !radius.is_finite() {
		return *pose;
	}

	let azimuth = offset.x.atan2(offset.z) + yaw;
	let elevation = ((offset.y / radius).clamp(-1.0, 1.0).asin() + pitch).clamp(-MAX_PITCH, MAX_PITCH);
	let flat = radius * elevation.cos();
	let offset = DVec3::new(flat * azimuth.sin(), radius * elevation.sin(), flat * azimuth.cos());

	CameraPose {
		position: pose.look_at + offset,
		..*pose
	}
}

/// Moves toward (`factor < 1`) or away from (`factor > 1`) the target.
pub fn dolly(pose: &CameraPose, factor: f64) -> CameraPose {
	let Some(direction) = pose.back_direction() else {
		return *pose;
	};
	let distance = (pose.distance() * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
	CameraPose {
		position: pose.look_at + direction * distance,
		..*pose
	}
}
