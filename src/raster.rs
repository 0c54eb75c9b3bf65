//! Integer line rasterizer over the collision grid
//!
//! Walks every cell a world-space segment passes through, probing each one
//! for a target classification. Unlike plain Bresenham, the walk keeps the
//! previous error term so it can also probe the two cells flanking a corner
//! crossing; a diagonal wall touched only at a corner is still reported.
//!
//! Used by path probing (find the first free cell toward a target) and by
//! the radar (find the first hazard cell along a bearing).

use crate::grid::{CellCoord, CellIndex, CellKind, CollisionGrid};
use glam::Vec2;

/// Outcome of a line cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineHit {
    /// Cell where the walk stopped; on a miss, the cast's terminal cell
    pub coord: CellCoord,
    /// Matching cell index, or `None` when the walk reached the terminal
    /// cell without a match
    pub cell: Option<CellIndex>,
}

impl LineHit {
    /// True when the cast matched a cell of the requested kind
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.cell.is_some()
    }
}

/// Probe one cell for the target kind.
///
/// A missing cell counts as a match when the target is `Empty`; it is
/// materialized so the caller gets a real index back.
fn probe(
    grid: &mut CollisionGrid,
    col: i32,
    row: i32,
    target: CellKind,
) -> Option<LineHit> {
    let coord = CellCoord::new(col, row);
    match grid.cell_index(coord) {
        Some(idx) if grid.cell(idx).kind == target => Some(LineHit {
            coord,
            cell: Some(idx),
        }),
        None if target == CellKind::Empty => {
            let idx = grid.ensure_cell(coord);
            Some(LineHit {
                coord,
                cell: Some(idx),
            })
        }
        _ => None,
    }
}

/// Cast a world-space segment across the grid and return the first cell of
/// `target` kind along it, or the terminal cell with no match.
///
/// Both endpoints are clamped into the grid window. The start cell itself
/// is probed before the walk begins.
pub fn cast_line(grid: &mut CollisionGrid, from: Vec2, to: Vec2, target: CellKind) -> LineHit {
    let start = grid.world_to_cell(from);
    let end = grid.world_to_cell(to);

    let mut x = start.col;
    let mut y = start.row;
    let mut dx = end.col - start.col;
    let mut dy = end.row - start.row;

    if let Some(hit) = probe(grid, x, y, target) {
        return hit;
    }

    let ystep = if dy < 0 {
        dy = -dy;
        -1
    } else {
        1
    };
    let xstep = if dx < 0 {
        dx = -dx;
        -1
    } else {
        1
    };

    // Doubled deltas keep the error term integral at half-cell precision
    let ddy = 2 * dy;
    let ddx = 2 * dx;

    if ddx >= ddy {
        // Shallow slope, x drives
        let mut error = dx;
        let mut errorprev = dx;
        for _ in 0..dx {
            x += xstep;
            error += ddy;
            if error > ddx {
                y += ystep;
                error -= ddx;
                if error + errorprev < ddx {
                    // Crossed below the corner
                    if let Some(hit) = probe(grid, x, y - ystep, target) {
                        return hit;
                    }
                } else if error + errorprev > ddx {
                    // Crossed above the corner
                    if let Some(hit) = probe(grid, x - xstep, y, target) {
                        return hit;
                    }
                } else {
                    // Exact corner crossing, probe both flanking cells
                    if let Some(hit) = probe(grid, x, y - ystep, target) {
                        return hit;
                    }
                    if let Some(hit) = probe(grid, x - xstep, y, target) {
                        return hit;
                    }
                }
            }
            if let Some(hit) = probe(grid, x, y, target) {
                return hit;
            }
            errorprev = error;
        }
    } else {
        // Steep slope, y drives
        let mut error = dy;
        let mut errorprev = dy;
        for _ in 0..dy {
            y += ystep;
            error += ddx;
            if error > ddy {
                x += xstep;
                error -= ddy;
                if error + errorprev < ddy {
                    if let Some(hit) = probe(grid, x - xstep, y, target) {
                        return hit;
                    }
                } else if error + errorprev > ddy {
                    if let Some(hit) = probe(grid, x, y - ystep, target) {
                        return hit;
                    }
                } else {
                    if let Some(hit) = probe(grid, x - xstep, y, target) {
                        return hit;
                    }
                    if let Some(hit) = probe(grid, x, y - ystep, target) {
                        return hit;
                    }
                }
            }
            if let Some(hit) = probe(grid, x, y, target) {
                return hit;
            }
            errorprev = error;
        }
    }

    LineHit {
        coord: CellCoord::new(x, y),
        cell: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavConfig;
    use crate::grid::Occupant;

    fn test_grid() -> CollisionGrid {
        let mut config = NavConfig::default();
        config.grid.width = 21;
        config.grid.height = 21;
        config.grid.cell_size = 20.0;
        CollisionGrid::new(config)
    }

    fn block(grid: &mut CollisionGrid, col: i32, row: i32) {
        grid.mark_hazard(CellCoord::new(col, row), Occupant::Head { hazard: 1 });
    }

    fn center(grid: &CollisionGrid, col: i32, row: i32) -> Vec2 {
        grid.cell_center(CellCoord::new(col, row))
    }

    #[test]
    fn test_miss_reaches_terminal_cell() {
        let mut grid = test_grid();
        let from = center(&grid, 3, 3);
        let to = center(&grid, 15, 9);

        let hit = cast_line(&mut grid, from, to, CellKind::Hazard);

        assert!(!hit.is_hit());
        assert_eq!(hit.coord, CellCoord::new(15, 9));
    }

    #[test]
    fn test_zero_length_cast() {
        let mut grid = test_grid();
        let p = center(&grid, 10, 10);

        let hit = cast_line(&mut grid, p, p, CellKind::Hazard);
        assert!(!hit.is_hit());
        assert_eq!(hit.coord, CellCoord::new(10, 10));
    }

    #[test]
    fn test_straight_hit_nearest_first() {
        let mut grid = test_grid();
        block(&mut grid, 8, 5);
        block(&mut grid, 11, 5);

        let from = center(&grid, 5, 5);
        let to = center(&grid, 14, 5);
        let hit = cast_line(&mut grid, from, to, CellKind::Hazard);

        assert!(hit.is_hit());
        assert_eq!(hit.coord, CellCoord::new(8, 5));
    }

    #[test]
    fn test_steep_line_hit() {
        let mut grid = test_grid();
        block(&mut grid, 6, 12);

        let from = center(&grid, 5, 3);
        let to = center(&grid, 7, 18);
        let hit = cast_line(&mut grid, from, to, CellKind::Hazard);

        assert!(hit.is_hit());
        assert_eq!(hit.coord, CellCoord::new(6, 12));
    }

    #[test]
    fn test_start_cell_probed_first() {
        let mut grid = test_grid();
        block(&mut grid, 4, 4);
        block(&mut grid, 6, 4);

        let from = center(&grid, 4, 4);
        let to = center(&grid, 10, 4);
        let hit = cast_line(&mut grid, from, to, CellKind::Hazard);

        assert!(hit.is_hit());
        assert_eq!(hit.coord, CellCoord::new(4, 4));
    }

    #[test]
    fn test_corner_touch_does_not_leak() {
        let mut grid = test_grid();
        // Diagonal pinch: the segment threads exactly between these two
        // cells and only touches them at the shared corner
        block(&mut grid, 6, 5);
        block(&mut grid, 5, 6);

        let from = center(&grid, 4, 4);
        let to = center(&grid, 8, 8);
        let hit = cast_line(&mut grid, from, to, CellKind::Hazard);

        assert!(hit.is_hit());
        assert!(hit.coord == CellCoord::new(6, 5) || hit.coord == CellCoord::new(5, 6));
    }

    #[test]
    fn test_empty_target_materializes_missing_cell() {
        let mut grid = test_grid();
        assert!(grid.cell_index(CellCoord::new(10, 10)).is_none());

        let from = center(&grid, 10, 10);
        let to = center(&grid, 15, 10);
        let hit = cast_line(&mut grid, from, to, CellKind::Empty);

        assert!(hit.is_hit());
        assert_eq!(hit.coord, CellCoord::new(10, 10));
        assert!(grid.cell_index(CellCoord::new(10, 10)).is_some());
    }

    #[test]
    fn test_empty_target_skips_populated_cells() {
        let mut grid = test_grid();
        // A populated run with a gap at (8, 5)
        for col in 5..=7 {
            block(&mut grid, col, 5);
        }

        let from = center(&grid, 5, 5);
        let to = center(&grid, 12, 5);
        let hit = cast_line(&mut grid, from, to, CellKind::Empty);

        assert!(hit.is_hit());
        assert_eq!(hit.coord, CellCoord::new(8, 5));
    }

    #[test]
    fn test_endpoints_clamped_into_window() {
        let mut grid = test_grid();
        // Far outside the window on both axes
        let from = center(&grid, 10, 10);
        let to = Vec2::new(from.x + 100_000.0, from.y);

        let hit = cast_line(&mut grid, from, to, CellKind::Hazard);
        assert!(!hit.is_hit());
        assert_eq!(hit.coord, CellCoord::new(20, 10));
    }
}
