//! Weighted A* path search over the collision grid
//!
//! - Frontier kept in a [`MinHeap`] ordered by `f = g + h`
//! - Cell scratch (`g`/`h`/`f`/`visited`/`closed`/`parent`) lives on the
//!   cells themselves and is cleared before every search
//! - Bounded by [`SearchConfig::max_iterations`] pops so a flooded grid can
//!   never stall the tick
//! - Optional closest-node fallback returns a partial path toward the goal
//!   when the goal is unreachable

mod heap;

pub use heap::MinHeap;

use crate::grid::{CellCoord, CellIndex, CollisionGrid};
use serde::{Deserialize, Serialize};

/// Distance estimate used to steer the search toward the goal.
///
/// All variants are measured in cell steps, not world units, and none of
/// them overestimates the remaining step count on an 8-connected grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Heuristic {
    /// `|dx| + |dy|`; fast and strongly goal-directed
    #[default]
    Manhattan,
    /// Octile distance, diagonal steps costed at √2
    Diagonal,
    /// `max(|dx|, |dy|)`; loosest estimate, explores the widest area
    Chebyshev,
}

impl Heuristic {
    /// Estimated remaining distance from `from` to `to` in cell steps
    #[must_use]
    pub fn evaluate(&self, from: CellCoord, to: CellCoord) -> f32 {
        let dx = (to.col - from.col).abs() as f32;
        let dy = (to.row - from.row).abs() as f32;
        match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Diagonal => (dx + dy) + (std::f32::consts::SQRT_2 - 2.0) * dx.min(dy),
            Heuristic::Chebyshev => dx.max(dy),
        }
    }
}

/// Tuning knobs for a single path search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Distance estimate steering the search
    pub heuristic: Heuristic,
    /// When the goal is unreachable, return a partial path to the expanded
    /// cell closest to it instead of an empty result
    pub return_closest: bool,
    /// Hard cap on frontier pops before the search gives up
    pub max_iterations: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::Manhattan,
            return_closest: false,
            max_iterations: 1000,
        }
    }
}

/// Outcome of a path search.
///
/// An empty `cells` list means no path was produced. A successful result
/// starts at the first step *after* the start cell and ends at the goal
/// (or, with the closest-node fallback, at the cell nearest to it).
#[derive(Debug, Clone, Default)]
pub struct PathResult {
    /// Path waypoints in travel order, start cell excluded
    pub cells: Vec<CellCoord>,
    /// Sum of cell weights along the path
    pub cost: f32,
}

impl PathResult {
    fn empty() -> Self {
        Self::default()
    }

    /// True when no path was produced
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of steps on the path
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Map the path onto world-space cell centers
    #[must_use]
    pub fn waypoints(&self, grid: &CollisionGrid) -> Vec<glam::Vec2> {
        self.cells.iter().map(|c| grid.cell_center(*c)).collect()
    }
}

/// Search for a path from `start` to `goal` over the grid.
///
/// Hazard cells are never entered. Diagonal steps are allowed; a step's
/// cost is the entered cell's raw weight, so negative (food) weights pull
/// the path through their cells. Out-of-window coordinates are clamped
/// onto the window edge before the search begins.
pub fn find_path(
    grid: &mut CollisionGrid,
    start: CellCoord,
    goal: CellCoord,
    config: &SearchConfig,
) -> PathResult {
    let start = grid.clamp_coord(start);
    let goal = grid.clamp_coord(goal);

    grid.reset_scratch();

    let start_idx = grid.ensure_cell(start);
    grid.cell_mut(start_idx).h = config.heuristic.evaluate(start, goal);

    let mut open: MinHeap<CellIndex> = MinHeap::new();
    open.push(start_idx, 0.0);

    let mut closest = start_idx;
    let mut iterations = 0usize;

    while let Some(current_idx) = open.pop() {
        iterations += 1;
        if iterations > config.max_iterations {
            log::debug!(
                "path search from {} to {} hit the {} iteration cap",
                start,
                goal,
                config.max_iterations
            );
            return PathResult::empty();
        }

        let current = grid.cell(current_idx);
        let current_coord = current.coord;
        let current_g = current.g;

        if current_coord == goal {
            return reconstruct(grid, current_idx);
        }

        grid.cell_mut(current_idx).closed = true;

        for neighbor_idx in grid.neighbors(current_coord) {
            let neighbor = grid.cell(neighbor_idx);
            if neighbor.closed {
                continue;
            }

            let tentative = current_g + neighbor.weight;
            let visited = neighbor.visited;
            if visited && tentative >= neighbor.g {
                continue;
            }

            let h = if visited {
                neighbor.h
            } else {
                config.heuristic.evaluate(neighbor.coord, goal)
            };

            let neighbor = grid.cell_mut(neighbor_idx);
            neighbor.visited = true;
            neighbor.parent = Some(current_idx);
            neighbor.h = h;
            neighbor.g = tentative;
            neighbor.f = tentative + h;
            let (score, g) = (neighbor.f, neighbor.g);

            if config.return_closest {
                let best = grid.cell(closest);
                if h < best.h || (h == best.h && g < best.g) {
                    closest = neighbor_idx;
                }
            }

            if visited {
                open.reschedule(neighbor_idx, score);
            } else {
                open.push(neighbor_idx, score);
            }
        }
    }

    if config.return_closest {
        return reconstruct(grid, closest);
    }
    PathResult::empty()
}

/// Walk parent links back from `end` and flip the result into travel order.
fn reconstruct(grid: &CollisionGrid, end: CellIndex) -> PathResult {
    let mut cells = Vec::new();
    let mut idx = end;
    while let Some(parent) = grid.cell(idx).parent {
        cells.push(grid.cell(idx).coord);
        idx = parent;
    }
    cells.reverse();
    PathResult {
        cells,
        cost: grid.cell(end).g,
    }
}
