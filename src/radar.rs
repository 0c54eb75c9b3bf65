//! Multi-directional hazard radar
//!
//! Sweeps the full circle around a position in fixed angular steps. Each
//! bearing casts a grid line out to the scan distance and reports either
//! the first hazard cell it crosses or an open ray. The sweep summary
//! (sorted contacts plus the fraction of open bearings) is what the
//! steering layer reads to pick an escape direction.

use crate::config::RadarConfig;
use crate::grid::{CellCoord, CellKind, CollisionGrid};
use crate::raster;
use glam::Vec2;
use std::cmp::Ordering;

/// Unit vectors for every whole-degree bearing, built once.
pub struct DirectionTable {
    units: Vec<Vec2>,
}

impl DirectionTable {
    /// Build the 360-entry table
    #[must_use]
    pub fn new() -> Self {
        let units = (0..360)
            .map(|deg| {
                let radians = (deg as f32).to_radians();
                Vec2::new(radians.cos(), radians.sin())
            })
            .collect();
        Self { units }
    }

    /// Number of table entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True when the table has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Unit vector for a bearing in degrees; wraps past a full turn
    #[must_use]
    pub fn unit(&self, degrees: usize) -> Vec2 {
        self.units[degrees % self.units.len()]
    }
}

impl Default for DirectionTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A bearing that reached the scan distance without touching a hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadarRay {
    /// Bearing in degrees
    pub heading_deg: u16,
    /// Cell where the cast ended
    pub terminus: CellCoord,
}

/// A bearing that hit a hazard cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadarContact {
    /// Bearing in degrees
    pub heading_deg: u16,
    /// The hazard cell that was hit
    pub coord: CellCoord,
    /// Squared distance from the scan origin to that cell's center
    pub distance_sq: f32,
}

/// Aggregated result of one radar sweep.
#[derive(Debug, Clone, Default)]
pub struct RadarSweep {
    /// Bearings with a clear line out to the scan distance
    pub open: Vec<RadarRay>,
    /// Hazard hits, nearest first
    pub contacts: Vec<RadarContact>,
    /// Total bearings cast
    pub rays: usize,
    /// `open.len() / rays`; 1.0 means nothing on the radar
    pub open_fraction: f32,
}

/// Sweeps the grid for hazards around a position.
pub struct RadarScanner {
    table: DirectionTable,
}

impl RadarScanner {
    /// Create a scanner with a freshly built direction table
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: DirectionTable::new(),
        }
    }

    /// Shared access to the direction table
    #[must_use]
    pub fn directions(&self) -> &DirectionTable {
        &self.table
    }

    /// Sweep the full circle from `origin`.
    ///
    /// The angular step is clamped to at least one degree. Casts share the
    /// grid's current tick; hazard probing materializes nothing.
    pub fn scan(&self, grid: &mut CollisionGrid, origin: Vec2, config: &RadarConfig) -> RadarSweep {
        let step = config.step_degrees.max(1);
        let mut open = Vec::new();
        let mut contacts = Vec::new();
        let mut rays = 0usize;

        for deg in (0..self.table.len()).step_by(step) {
            let target = origin + self.table.unit(deg) * config.scan_distance;
            let hit = raster::cast_line(grid, origin, target, CellKind::Hazard);
            rays += 1;
            if hit.is_hit() {
                let contact_point = grid.cell_center(hit.coord);
                contacts.push(RadarContact {
                    heading_deg: deg as u16,
                    coord: hit.coord,
                    distance_sq: contact_point.distance_squared(origin),
                });
            } else {
                open.push(RadarRay {
                    heading_deg: deg as u16,
                    terminus: hit.coord,
                });
            }
        }

        contacts.sort_by(|a, b| {
            a.distance_sq
                .partial_cmp(&b.distance_sq)
                .unwrap_or(Ordering::Equal)
        });

        let open_fraction = if rays > 0 {
            open.len() as f32 / rays as f32
        } else {
            0.0
        };
        RadarSweep {
            open,
            contacts,
            rays,
            open_fraction,
        }
    }
}

impl Default for RadarScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Intersection of two line segments, if their carrier lines cross.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Crossing point of the carrier lines
    pub point: Vec2,
    /// True when the point lies strictly inside the first segment
    pub on_first: bool,
    /// True when the point lies strictly inside the second segment
    pub on_second: bool,
}

/// Intersect segment `a1..a2` with segment `b1..b2`.
///
/// Returns `None` for parallel carrier lines. Endpoint touches do not
/// count as being on a segment.
#[must_use]
pub fn segment_intersection(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<Intersection> {
    let denominator = (b2.y - b1.y) * (a2.x - a1.x) - (b2.x - b1.x) * (a2.y - a1.y);
    if denominator == 0.0 {
        return None;
    }
    let dy = a1.y - b1.y;
    let dx = a1.x - b1.x;
    let ua = ((b2.x - b1.x) * dy - (b2.y - b1.y) * dx) / denominator;
    let ub = ((a2.x - a1.x) * dy - (a2.y - a1.y) * dx) / denominator;

    Some(Intersection {
        point: a1 + (a2 - a1) * ua,
        on_first: ua > 0.0 && ua < 1.0,
        on_second: ub > 0.0 && ub < 1.0,
    })
}
