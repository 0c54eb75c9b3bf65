//! Per-tick collision grid
//!
//! A sliding square window of cells centered on the agent and snapped to a
//! world-space lattice, so cell boundaries stay put while the agent moves
//! within a cell. Cells are materialized lazily into a per-tick arena: only
//! cells something touched exist, everything else is implicitly empty at
//! the default weight. Arena indices, not references, link cells together,
//! which keeps the search scratch free of borrow cycles.
//!
//! [`CollisionGrid::rebuild`] ingests a [`WorldSnapshot`] from scratch each
//! tick: hazards stamp threat rings around every body part, food stamps
//! negative weights and aggregates into coarse scored groups. The rebuild
//! also distills the per-tick intelligence the steering layer reads:
//! sorted [`Aggressor`] records and sorted [`FoodGroup`]s.

mod cell;
mod food;
mod threat;

pub use cell::{Cell, CellCoord, CellIndex, CellKind, Occupant};
pub use food::FoodGroup;
pub use threat::{Aggressor, ClosestSegment};

use crate::config::NavConfig;
use crate::search::{self, PathResult};
use crate::snapshot::WorldSnapshot;
use glam::Vec2;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Neighbor expansion order: W, E, S, N, then the four diagonals.
/// Fixed so equal-cost searches stay reproducible.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Counters describing the most recent rebuild.
#[derive(Debug, Clone, Copy, Default)]
pub struct RebuildStats {
    /// Impassable cells stamped by hazard cores
    pub hazard_cells: usize,
    /// Empty cells raised above the default weight by threat rings
    pub penalty_cells: usize,
    /// Cells carrying food
    pub food_cells: usize,
    /// Total cells materialized this tick
    pub cells_touched: usize,
    /// Occupied coarse food buckets
    pub food_groups: usize,
    /// Hazards tracked as aggressors
    pub aggressors: usize,
    /// Dying segments dropped after the budget ran out
    pub dying_skipped: usize,
}

impl RebuildStats {
    /// Format the counters as a single log line
    #[must_use]
    pub fn format_stats(&self) -> String {
        format!(
            "cells: {} ({} hazard, {} penalty, {} food) | food groups: {} | aggressors: {} | dying skipped: {}",
            self.cells_touched,
            self.hazard_cells,
            self.penalty_cells,
            self.food_cells,
            self.food_groups,
            self.aggressors,
            self.dying_skipped
        )
    }
}

/// The weighted occupancy grid and everything derived from it.
pub struct CollisionGrid {
    config: NavConfig,
    /// World position of the window's minimum corner
    origin: Vec2,
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    lookup: FxHashMap<CellCoord, CellIndex>,
    aggressors: Vec<Aggressor>,
    food_groups: Vec<FoodGroup>,
    stats: RebuildStats,
}

impl CollisionGrid {
    /// Create a grid with its window centered on the world origin.
    #[must_use]
    pub fn new(config: NavConfig) -> Self {
        let width = config.grid.width as i32;
        let height = config.grid.height as i32;
        let mut grid = Self {
            config,
            origin: Vec2::ZERO,
            width,
            height,
            cells: Vec::new(),
            lookup: FxHashMap::default(),
            aggressors: Vec::new(),
            food_groups: Vec::new(),
            stats: RebuildStats::default(),
        };
        grid.recenter(Vec2::ZERO);
        grid
    }

    /// The configuration the grid was built with
    #[must_use]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    /// World position of the window's minimum corner
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Window width in cells
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Window height in cells
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// All cells materialized this tick, in creation order
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Aggressor records from the last rebuild, nearest first
    #[must_use]
    pub fn aggressors(&self) -> &[Aggressor] {
        &self.aggressors
    }

    /// Food groups from the last rebuild, best value first
    #[must_use]
    pub fn food_groups(&self) -> &[FoodGroup] {
        &self.food_groups
    }

    /// Counters from the last rebuild
    #[must_use]
    pub fn stats(&self) -> RebuildStats {
        self.stats
    }

    /// Throw away the previous tick and ingest a fresh snapshot.
    pub fn rebuild(&mut self, snapshot: &WorldSnapshot) {
        self.recenter(snapshot.agent.position);
        self.cells.clear();
        self.lookup.clear();
        self.aggressors.clear();
        self.food_groups.clear();

        let (aggressors, dying_skipped) = threat::populate_hazards(self, snapshot);
        self.aggressors = aggressors;
        self.food_groups = food::populate_food(self, snapshot);

        let mut stats = RebuildStats {
            cells_touched: self.cells.len(),
            food_groups: self.food_groups.len(),
            aggressors: self.aggressors.len(),
            dying_skipped,
            ..RebuildStats::default()
        };
        let default_weight = self.config.grid.default_cell_weight;
        for cell in &self.cells {
            match cell.kind {
                CellKind::Hazard => stats.hazard_cells += 1,
                CellKind::Food => stats.food_cells += 1,
                CellKind::Empty if cell.weight > default_weight => stats.penalty_cells += 1,
                CellKind::Empty => {}
            }
        }
        self.stats = stats;

        if snapshot.debug_enabled {
            log::debug!("grid rebuild: {}", self.stats.format_stats());
        }
    }

    /// Re-anchor the window around a position.
    ///
    /// The anchor snaps to the cell-size lattice first, so the window only
    /// moves in whole-cell steps and cell boundaries never shift under a
    /// position drifting within one cell.
    pub fn recenter(&mut self, position: Vec2) {
        let cs = self.config.grid.cell_size;
        let sx = position.x.floor();
        let sx = sx - sx.rem_euclid(cs);
        let sy = position.y.floor();
        let sy = sy - sy.rem_euclid(cs);
        self.origin = Vec2::new(
            (sx - self.width as f32 / 2.0 * cs).floor(),
            (sy - self.height as f32 / 2.0 * cs).floor(),
        );
    }

    /// Map a world position to its cell, clamping onto the window edge.
    #[must_use]
    pub fn world_to_cell(&self, position: Vec2) -> CellCoord {
        let cs = self.config.grid.cell_size;
        let col = ((position.x - self.origin.x) / cs).floor() as i32;
        let row = ((position.y - self.origin.y) / cs).floor() as i32;
        CellCoord::new(col.clamp(0, self.width - 1), row.clamp(0, self.height - 1))
    }

    /// World position of a cell's center.
    #[must_use]
    pub fn cell_center(&self, coord: CellCoord) -> Vec2 {
        let cs = self.config.grid.cell_size;
        self.origin + Vec2::new((coord.col as f32 + 0.5) * cs, (coord.row as f32 + 0.5) * cs)
    }

    /// True when a world position lies strictly inside the window.
    #[must_use]
    pub fn contains_world(&self, position: Vec2) -> bool {
        let cs = self.config.grid.cell_size;
        let max_x = self.origin.x + self.width as f32 * cs;
        let max_y = self.origin.y + self.height as f32 * cs;
        position.x > self.origin.x
            && position.x < max_x
            && position.y > self.origin.y
            && position.y < max_y
    }

    /// True when a coordinate lies inside the window.
    #[must_use]
    pub fn in_bounds(&self, coord: CellCoord) -> bool {
        coord.col >= 0 && coord.col < self.width && coord.row >= 0 && coord.row < self.height
    }

    /// Clamp a coordinate onto the window.
    #[must_use]
    pub fn clamp_coord(&self, coord: CellCoord) -> CellCoord {
        CellCoord::new(
            coord.col.clamp(0, self.width - 1),
            coord.row.clamp(0, self.height - 1),
        )
    }

    /// How many whole cells a world-space radius spans.
    #[must_use]
    pub fn cells_for_radius(&self, radius: f32) -> i32 {
        (radius / self.config.grid.cell_size).floor() as i32
    }

    /// Collision radius of a body part at the given scale.
    #[must_use]
    pub fn segment_radius(&self, scale: f32) -> f32 {
        self.config.grid.base_segment_radius * scale
    }

    /// Arena index of a cell, if it was materialized this tick.
    #[must_use]
    pub fn cell_index(&self, coord: CellCoord) -> Option<CellIndex> {
        self.lookup.get(&coord).copied()
    }

    /// Cell by arena index. The index must come from this grid's current
    /// tick.
    #[must_use]
    pub fn cell(&self, index: CellIndex) -> &Cell {
        &self.cells[index as usize]
    }

    /// Mutable cell by arena index
    pub fn cell_mut(&mut self, index: CellIndex) -> &mut Cell {
        &mut self.cells[index as usize]
    }

    /// Cell by coordinate, if materialized.
    #[must_use]
    pub fn cell_at(&self, coord: CellCoord) -> Option<&Cell> {
        self.cell_index(coord).map(|idx| self.cell(idx))
    }

    /// Get a cell's index, materializing it as empty at the default weight
    /// if it does not exist yet. Out-of-window coordinates are clamped.
    pub fn ensure_cell(&mut self, coord: CellCoord) -> CellIndex {
        let coord = self.clamp_coord(coord);
        if let Some(&idx) = self.lookup.get(&coord) {
            return idx;
        }
        let idx = self.cells.len() as CellIndex;
        self.cells.push(Cell::new(
            coord,
            self.config.grid.default_cell_weight,
            CellKind::Empty,
        ));
        self.lookup.insert(coord, idx);
        idx
    }

    /// Mark a cell impassable and record what occupies it.
    ///
    /// Upgrading a cell discards its previous weight and occupants; a cell
    /// that is already a hazard keeps them and gains the new occupant.
    pub fn mark_hazard(&mut self, coord: CellCoord, occupant: Occupant) -> CellIndex {
        let idx = self.ensure_cell(coord);
        let cell = &mut self.cells[idx as usize];
        if cell.kind != CellKind::Hazard {
            cell.kind = CellKind::Hazard;
            cell.weight = 0.0;
            cell.occupants.clear();
        }
        cell.occupants.push(occupant);
        idx
    }

    /// Raise an empty cell's weight to at least `weight`.
    ///
    /// Hazard and food cells are left untouched, and overlapping penalties
    /// compose by maximum, so a cell's weight reflects the worst threat
    /// covering it regardless of stamp order.
    pub fn bump_penalty(&mut self, coord: CellCoord, weight: f32) -> CellIndex {
        let idx = self.ensure_cell(coord);
        let cell = &mut self.cells[idx as usize];
        if cell.kind == CellKind::Empty {
            cell.weight = cell.weight.max(weight);
        }
        idx
    }

    /// Mark a cell as food with a negative weight.
    ///
    /// Hazard cells and cells already carrying a ring penalty win over
    /// food. Stacked food keeps the most negative weight offered.
    pub fn mark_food(&mut self, coord: CellCoord, weight: f32, occupant: Occupant) -> CellIndex {
        let idx = self.ensure_cell(coord);
        let default_weight = self.config.grid.default_cell_weight;
        let cell = &mut self.cells[idx as usize];
        match cell.kind {
            CellKind::Hazard => {}
            CellKind::Empty if cell.weight > default_weight => {}
            CellKind::Empty => {
                cell.kind = CellKind::Food;
                cell.weight = weight;
                cell.occupants.push(occupant);
            }
            CellKind::Food => {
                cell.weight = cell.weight.min(weight);
                cell.occupants.push(occupant);
            }
        }
        idx
    }

    /// Traversable neighbors of a cell in the fixed expansion order.
    ///
    /// Missing neighbor cells are materialized; hazard cells and cells
    /// outside the window are skipped.
    pub fn neighbors(&mut self, coord: CellCoord) -> SmallVec<[CellIndex; 8]> {
        let mut out = SmallVec::new();
        for (dc, dr) in NEIGHBOR_OFFSETS {
            let neighbor = coord.offset(dc, dr);
            if !self.in_bounds(neighbor) {
                continue;
            }
            let idx = self.ensure_cell(neighbor);
            if self.cells[idx as usize].kind == CellKind::Hazard {
                continue;
            }
            out.push(idx);
        }
        out
    }

    /// Clear the search scratch on every materialized cell.
    pub fn reset_scratch(&mut self) {
        for cell in &mut self.cells {
            cell.reset_scratch();
        }
    }

    /// Search for a path between two world positions using the configured
    /// search settings. Both endpoints are clamped into the window.
    pub fn generate_path(&mut self, from: Vec2, to: Vec2) -> PathResult {
        let start = self.world_to_cell(from);
        let goal = self.world_to_cell(to);
        self.ensure_cell(start);
        self.ensure_cell(goal);
        let config = self.config.search;
        search::find_path(self, start, goal, &config)
    }
}
