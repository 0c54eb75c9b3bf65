//! Grid cell model
//!
//! The atomic unit of the spatial index: a fixed-size square of world space
//! with a traversal weight, an occupancy classification, and the scratch
//! fields the path search writes while it runs.

use smallvec::SmallVec;

/// Index of a cell in the grid's per-tick arena.
pub type CellIndex = u32;

/// Integer (column, row) address of a cell inside the grid window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    /// Column, increasing with world x
    pub col: i32,
    /// Row, increasing with world y
    pub row: i32,
}

impl CellCoord {
    /// Create a new coordinate
    #[must_use]
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Coordinate shifted by the given column/row deltas
    #[must_use]
    pub fn offset(self, dc: i32, dr: i32) -> Self {
        Self::new(self.col + dc, self.row + dr)
    }

    /// Chebyshev (chessboard) distance to another coordinate
    #[must_use]
    pub fn chebyshev(self, other: Self) -> i32 {
        (self.col - other.col).abs().max((self.row - other.row).abs())
    }
}

impl std::fmt::Display for CellCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}]", self.col, self.row)
    }
}

/// Semantic occupancy of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    /// Nothing lethal or edible here; weight expresses proximity risk
    #[default]
    Empty,
    /// Lethal contact; always impassable
    Hazard,
    /// Collectible item(s); negative weight makes the cell attractive
    Food,
}

/// Reference to the world object that justifies a cell's classification.
///
/// Indices refer into the snapshot the grid was rebuilt from and are only
/// meaningful for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    /// A hazard's head
    Head {
        /// Identity of the hazard
        hazard: u64,
    },
    /// A hazard body segment
    Segment {
        /// Identity of the hazard
        hazard: u64,
        /// Index into that hazard's segment list
        segment: usize,
    },
    /// A food item, by index into the snapshot's food list
    Food {
        /// Index into the snapshot's food list
        item: usize,
    },
}

/// One cell of the collision grid.
///
/// Cells are created lazily on first touch and live only until the next
/// rebuild; nothing may hold on to them across ticks. The search-scratch
/// fields (`g`, `h`, `f`, `visited`, `closed`, `parent`) belong to the path
/// search and are cleared by [`Cell::reset_scratch`] before every search.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Grid address of this cell
    pub coord: CellCoord,
    /// Traversal cost; 0 means impassable, negative means attractive
    pub weight: f32,
    /// Occupancy classification
    pub kind: CellKind,
    /// World objects justifying a non-empty classification
    pub occupants: SmallVec<[Occupant; 2]>,
    /// Accumulated cost from the search start
    pub g: f32,
    /// Heuristic estimate to the search goal
    pub h: f32,
    /// Total score `g + h`
    pub f: f32,
    /// Whether the search has relaxed this cell at least once
    pub visited: bool,
    /// Whether the search has expanded this cell
    pub closed: bool,
    /// Arena index of the predecessor on the best known path
    pub parent: Option<CellIndex>,
}

impl Cell {
    /// Create a cell with cleared search scratch
    #[must_use]
    pub fn new(coord: CellCoord, weight: f32, kind: CellKind) -> Self {
        Self {
            coord,
            weight,
            kind,
            occupants: SmallVec::new(),
            g: 0.0,
            h: 0.0,
            f: 0.0,
            visited: false,
            closed: false,
            parent: None,
        }
    }

    /// Traversal cost when entering from `from`.
    ///
    /// The weight is scaled by √2 when the step is diagonal (both
    /// coordinates differ).
    #[must_use]
    pub fn cost(&self, from: CellCoord) -> f32 {
        if from.col != self.coord.col && from.row != self.coord.row {
            return self.weight * std::f32::consts::SQRT_2;
        }
        self.weight
    }

    /// True when the cell cannot be traversed at all
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.weight == 0.0
    }

    /// Clear the path-search scratch fields
    pub fn reset_scratch(&mut self) {
        self.g = 0.0;
        self.h = 0.0;
        self.f = 0.0;
        self.visited = false;
        self.closed = false;
        self.parent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_orthogonal() {
        let cell = Cell::new(CellCoord::new(5, 5), 1000.0, CellKind::Empty);

        assert_eq!(cell.cost(CellCoord::new(4, 5)), 1000.0);
        assert_eq!(cell.cost(CellCoord::new(5, 4)), 1000.0);
        assert_eq!(cell.cost(CellCoord::new(6, 5)), 1000.0);
    }

    #[test]
    fn test_cost_diagonal() {
        let cell = Cell::new(CellCoord::new(5, 5), 1000.0, CellKind::Empty);
        let expected = 1000.0 * std::f32::consts::SQRT_2;

        assert_eq!(cell.cost(CellCoord::new(4, 4)), expected);
        assert_eq!(cell.cost(CellCoord::new(6, 4)), expected);
        assert_eq!(cell.cost(CellCoord::new(6, 6)), expected);
    }

    #[test]
    fn test_hazard_is_blocked() {
        let hazard = Cell::new(CellCoord::new(0, 0), 0.0, CellKind::Hazard);
        assert!(hazard.is_blocked());

        let empty = Cell::new(CellCoord::new(0, 0), 1000.0, CellKind::Empty);
        assert!(!empty.is_blocked());

        // Food is attractive (negative weight), never blocked
        let food = Cell::new(CellCoord::new(0, 0), -25.0, CellKind::Food);
        assert!(!food.is_blocked());
    }

    #[test]
    fn test_reset_scratch() {
        let mut cell = Cell::new(CellCoord::new(1, 2), 1000.0, CellKind::Empty);
        cell.g = 3.0;
        cell.h = 4.0;
        cell.f = 7.0;
        cell.visited = true;
        cell.closed = true;
        cell.parent = Some(9);

        cell.reset_scratch();

        assert_eq!(cell.g, 0.0);
        assert_eq!(cell.h, 0.0);
        assert_eq!(cell.f, 0.0);
        assert!(!cell.visited);
        assert!(!cell.closed);
        assert!(cell.parent.is_none());
    }

    #[test]
    fn test_chebyshev_distance() {
        let a = CellCoord::new(2, 3);
        assert_eq!(a.chebyshev(CellCoord::new(2, 3)), 0);
        assert_eq!(a.chebyshev(CellCoord::new(5, 4)), 3);
        assert_eq!(a.chebyshev(CellCoord::new(0, -2)), 5);
    }
}
