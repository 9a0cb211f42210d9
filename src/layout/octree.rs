//! Barnes–Hut octree over particle positions.
//!
//! Cells live in a flat arena and reference children by index. Leaves hold
//! every particle that landed in them; exactly coincident particles share a
//! leaf instead of forcing endless subdivision.

use glam::DVec3;

const MAX_DEPTH: usize = 48;
const NO_CHILD: usize = usize::MAX;

#[derive(Clone, Debug)]
pub(super) struct Cell {
	pub min: DVec3,
	pub size: f64,
	children: [usize; 8],
	/// Particle indices; only populated on leaves.
	pub points: Vec<usize>,
	/// Sum of particle weights below this cell.
	pub weight: f64,
	/// Weight-averaged position (by absolute weight).
	pub center: DVec3,
}

impl Cell {
	fn new(min: DVec3, size: f64) -> Self {
		Self {
			min,
			size,
			children: [NO_CHILD; 8],
			points: Vec::new(),
			weight: 0.0,
			center: DVec3::ZERO,
		}
	}

	pub fn is_leaf(&self) -> bool {
		self.children.iter().all(|&c| c == NO_CHILD)
	}

	pub fn max(&self) -> DVec3 {
		self.min + DVec3::splat(self.size)
	}

	fn octant(&self, p: DVec3) -> usize {
		let mid = self.size / 2.0;
		let mut o = 0;
		if p.x >= self.min.x + mid {
			o |= 1;
		}
		if p.y >= self.min.y + mid {
			o |= 2;
		}
		if p.z >= self.min.z + mid {
			o |= 4;
		}
		o
	}

	fn child_min(&self, octant: usize) -> DVec3 {
		let half = self.size / 2.0;
		DVec3::new(
			self.min.x + if octant & 1 != 0 { half } else { 0.0 },
			self.min.y + if octant & 2 != 0 { half } else { 0.0 },
			self.min.z + if octant & 4 != 0 { half } else { 0.0 },
		)
	}
}

pub(super) struct Octree<'a> {
	cells: Vec<Cell>,
	positions: &'a [DVec3],
}

impl<'a> Octree<'a> {
	/// Builds a tree over `positions`, accumulating `weights` per cell.
	pub fn build(positions: &'a [DVec3], weights: &[f64]) -> Self {
		let (mut lo, mut hi) = (DVec3::MAX, DVec3::MIN);
		for &p in positions {
			lo = lo.min(p);
			hi = hi.max(p);
		}
		// Pad so points on the upper bound still fall inside.
		let size = (hi - lo).max_element().max(1e-6) * (1.0 + 1e-9) + 1e-9;

		let mut tree = Self {
			cells: vec![Cell::new(lo, size)],
			positions,
		};
		if positions.is_empty() {
			return tree;
		}
		for i in 0..positions.len() {
			tree.insert(i);
		}
		tree.accumulate(0, weights);
		tree
	}

	fn insert(&mut self, point: usize) {
		let p = self.positions[point];
		let mut cell = 0;
		let mut depth = 0;
		loop {
			if self.cells[cell].is_leaf() {
				let occupied = !self.cells[cell].points.is_empty();
				let coincident = occupied && self.positions[self.cells[cell].points[0]] == p;
				if !occupied || coincident || depth >= MAX_DEPTH {
					self.cells[cell].points.push(point);
					return;
				}
				// Split: push the existing occupants one level down.
				let occupants = std::mem::take(&mut self.cells[cell].points);
				for occupant in occupants {
					let o = self.cells[cell].octant(self.positions[occupant]);
					let child = self.child(cell, o);
					self.cells[child].points.push(occupant);
				}
			}
			let o = self.cells[cell].octant(p);
			cell = self.child(cell, o);
			depth += 1;
		}
	}

	fn child(&mut self, cell: usize, octant: usize) -> usize {
		let existing = self.cells[cell].children[octant];
		if existing != NO_CHILD {
			return existing;
		}
		let min = self.cells[cell].child_min(octant);
		let size = self.cells[cell].size / 2.0;
		self.cells.push(Cell::new(min, size));
		let idx = self.cells.len() - 1;
		self.cells[cell].children[octant] = idx;
		idx
	}

	fn accumulate(&mut self, cell: usize, weights: &[f64]) {
		let (mut weight, mut weighted, mut abs_total, mut plain, mut count) =
			(0.0, DVec3::ZERO, 0.0, DVec3::ZERO, 0usize);

		if self.cells[cell].is_leaf() {
			for &i in &self.cells[cell].points {
				let w = weights.get(i).copied().unwrap_or(0.0);
				weight += w;
				weighted += self.positions[i] * w.abs();
				abs_total += w.abs();
				plain += self.positions[i];
				count += 1;
			}
		} else {
			for octant in 0..8 {
				let child = self.cells[cell].children[octant];
				if child == NO_CHILD {
					continue;
				}
				self.accumulate(child, weights);
				let c = &self.cells[child];
				weight += c.weight;
				weighted += c.center * c.weight.abs();
				abs_total += c.weight.abs();
				plain += c.center;
				count += 1;
			}
		}

		let center = if abs_total > 0.0 {
			weighted * (1.0 / abs_total)
		} else if count > 0 {
			plain * (1.0 / count as f64)
		} else {
			self.cells[cell].min
		};
		let c = &mut self.cells[cell];
		c.weight = weight;
		c.center = center;
	}

	/// Pre-order traversal. Returning `true` from `visit` skips the cell's
	/// children.
	pub fn visit(&self, mut visit: impl FnMut(&Cell) -> bool) {
		let mut stack = vec![0usize];
		while let Some(idx) = stack.pop() {
			let cell = &self.cells[idx];
			if cell.points.is_empty() && cell.is_leaf() {
				continue;
			}
			if visit(cell) {
				continue;
			}
			stack.extend(cell.children.iter().rev().copied().filter(|&c| c != NO_CHILD));
		}
	}
}
