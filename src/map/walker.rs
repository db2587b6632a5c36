//! Connected-component walker shared by map construction and rendering
//!
//! A walk floods outward from a seed pixel over 4-neighbours carrying the
//! same region id. The caller decides how visits are remembered (a dense
//! mask shared across a whole scan, or a sparse set per render) and what
//! happens to each reached pixel.

use std::collections::VecDeque;

use ahash::AHashSet;

use crate::core::types::RegionId;
use crate::map::grid::Grid;

/// Visit bookkeeping for a walk
pub trait Visited {
    /// Mark `(x, y)`; returns `false` if it was already marked
    fn mark(&mut self, x: usize, y: usize) -> bool;
}

/// Grid-sized visit mask, meant to be shared across many walks
#[derive(Debug, Clone)]
pub struct VisitMask {
    seen: Grid<bool>,
}

impl VisitMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            seen: Grid::new(width, height),
        }
    }
}

impl Visited for VisitMask {
    fn mark(&mut self, x: usize, y: usize) -> bool {
        match self.seen.get_mut(x, y) {
            Some(seen) if !*seen => {
                *seen = true;
                true
            }
            _ => false,
        }
    }
}

/// Hash-set visits, cheap to create for a single region's walk
#[derive(Debug, Clone, Default)]
pub struct VisitSet {
    seen: AHashSet<(usize, usize)>,
}

impl VisitSet {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Visited for VisitSet {
    fn mark(&mut self, x: usize, y: usize) -> bool {
        self.seen.insert((x, y))
    }
}

/// Flood the blob containing `start`, calling `on_pixel` once per newly
/// visited pixel. Returns the number of pixels visited by this walk.
pub fn walk_component<V, F>(
    labels: &Grid<RegionId>,
    start: (usize, usize),
    visited: &mut V,
    mut on_pixel: F,
) -> usize
where
    V: Visited,
    F: FnMut(usize, usize),
{
    let Some(&target) = labels.get(start.0, start.1) else {
        return 0;
    };

    let mut queue = VecDeque::from([start]);
    let mut reached = 0;

    while let Some((x, y)) = queue.pop_front() {
        if !visited.mark(x, y) {
            continue;
        }
        reached += 1;
        on_pixel(x, y);

        for (nx, ny) in labels.neighbors4(x, y) {
            if labels[(nx, ny)] == target {
                queue.push_back((nx, ny));
            }
        }
    }

    reached
}
