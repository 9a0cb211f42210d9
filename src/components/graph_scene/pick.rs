//! Screen-space hit testing over projected node discs.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// One projected node: a disc in canvas pixels plus its camera depth.
#[derive(Clone, Debug)]
pub struct ScreenDisc {
	index: usize,
	center: [f64; 2],
	radius: f64,
	depth: f64,
}

impl ScreenDisc {
	pub fn new(index: usize, x: f64, y: f64, radius: f64, depth: f64) -> Self {
		Self {
			index,
			center: [x, y],
			radius,
			depth,
		}
	}
}

impl RTreeObject for ScreenDisc {
	type Envelope = AABB<[f64; 2]>;

	fn envelope(&self) -> Self::Envelope {
		let [x, y] = self.center;
		AABB::from_corners([x - self.radius, y - self.radius], [x + self.radius, y + self.radius])
	}
}

impl PointDistance for ScreenDisc {
	fn distance_2(&self, point: &[f64; 2]) -> f64 {
		let d = ((point[0] - self.center[0]).hypot(point[1] - self.center[1]) - self.radius).max(0.0);
		d * d
	}

	fn contains_point(&self, point: &[f64; 2]) -> bool {
		(point[0] - self.center[0]).hypot(point[1] - self.center[1]) <= self.radius
	}
}

/// R-tree over the discs of one frame.
#[derive(Default)]
pub struct PickIndex {
	tree: RTree<ScreenDisc>,
}

impl PickIndex {
	pub fn build(discs: impl IntoIterator<Item = ScreenDisc>) -> Self {
		Self {
			tree: RTree::bulk_load(discs.into_iter().collect()),
		}
	}

	/// The disc under `(x, y)` closest to the camera.
	pub fn hit(&self, x: f64, y: f64) -> Option<usize> {
		self.tree
			.locate_all_at_point(&[x, y])
			.min_by(|a, b| a.depth.total_cmp(&b.depth))
			.map(|d| d.index)
	}
}
