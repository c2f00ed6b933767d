//! Uniform-grid broad-phase.
//!
//! Every proxy is inserted into the cells covered by its swept box (pre-step
//! box joined with the predicted one), so a fast body shares a cell with
//! anything along its path. Pairs come out sorted so resolution order only
//! depends on slot order.

use crate::integrator::Motion;
use crate::shape::Aabb;
use std::collections::HashMap;

/// Proxies covering more cells than this skip the grid and get tested
/// against every other proxy instead.
const MAX_CELLS_PER_PROXY: i64 = 1024;

/// Smallest cell size the grid accepts.
const MIN_CELL_SIZE: f32 = 1e-3;

#[derive(Debug, Default)]
pub struct BroadPhase {
    cells: HashMap<(i32, i32), Vec<usize>>,
    oversized: Vec<usize>,
    bounds: Vec<Aabb>,
}

/// Cell size covering the largest body dimension.
pub fn auto_cell_size(motions: &[Motion]) -> f32 {
    motions
        .iter()
        .map(|m| m.start.size.max_element())
        .fold(MIN_CELL_SIZE, f32::max)
}

fn cell_of(v: f32, cell_size: f32) -> i32 {
    (v / cell_size).floor() as i32
}

impl BroadPhase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate pairs as `(i, j)` indices into `motions`, `i < j`.
    ///
    /// Never misses a pair whose swept boxes overlap or touch within
    /// `margin`. Static-static pairs and proxies with collisions disabled on
    /// both axes are left out.
    pub fn find_pairs(
        &mut self,
        motions: &[Motion],
        cell_size: f32,
        margin: f32,
    ) -> Vec<(usize, usize)> {
        let cell_size = cell_size.max(MIN_CELL_SIZE);
        self.cells.values_mut().for_each(Vec::clear);
        self.oversized.clear();
        self.bounds.clear();
        self.bounds
            .extend(motions.iter().map(|m| m.swept().inflated(margin)));

        for (i, motion) in motions.iter().enumerate() {
            if !motion.axes.any() {
                continue;
            }
            let bounds = self.bounds[i];
            let max = bounds.max();
            let (x0, y0) = (cell_of(bounds.min.x, cell_size), cell_of(bounds.min.y, cell_size));
            let (x1, y1) = (cell_of(max.x, cell_size), cell_of(max.y, cell_size));

            let span = (i64::from(x1) - i64::from(x0) + 1) * (i64::from(y1) - i64::from(y0) + 1);
            if span > MAX_CELLS_PER_PROXY {
                self.oversized.push(i);
                continue;
            }
            for cy in y0..=y1 {
                for cx in x0..=x1 {
                    self.cells.entry((cx, cy)).or_default().push(i);
                }
            }
        }

        let mut pairs = Vec::new();
        for members in self.cells.values() {
            for (n, &a) in members.iter().enumerate() {
                for &b in &members[n + 1..] {
                    self.consider(motions, a, b, &mut pairs);
                }
            }
        }
        for &big in &self.oversized {
            for other in 0..motions.len() {
                if other != big && motions[other].axes.any() {
                    self.consider(motions, big.min(other), big.max(other), &mut pairs);
                }
            }
        }
        self.cells.retain(|_, members| !members.is_empty());

        pairs.sort_unstable();
        pairs.dedup();
        pairs
    }

    fn consider(&self, motions: &[Motion], a: usize, b: usize, pairs: &mut Vec<(usize, usize)>) {
        if motions[a].kind.is_static() && motions[b].kind.is_static() {
            return;
        }
        if self.bounds[a].touches(&self.bounds[b], 0.0) {
            pairs.push((a, b));
        }
    }
}
