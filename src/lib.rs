//! Spatial reasoning for an agent in a continuous 2D arena
//!
//! This crate provides:
//! - A weighted collision grid rebuilt from a world snapshot every tick
//! - Threat-zone weighting around moving hazards and their body segments
//! - Bounded A* path search with an optional closest-node fallback
//! - Integer line rasterization for path probing and radar casts
//! - A full-circle hazard radar with open/contact aggregation
//! - Food clustering into scored, sorted target groups

pub mod config;
pub mod grid;
pub mod radar;
pub mod raster;
pub mod search;
pub mod snapshot;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{ConfigError, FoodConfig, GridConfig, NavConfig, RadarConfig};
    pub use crate::grid::{
        Aggressor, Cell, CellCoord, CellIndex, CellKind, ClosestSegment, CollisionGrid, FoodGroup,
        Occupant, RebuildStats,
    };
    pub use crate::radar::{RadarContact, RadarRay, RadarScanner, RadarSweep};
    pub use crate::raster::{cast_line, LineHit};
    pub use crate::search::{find_path, Heuristic, PathResult, SearchConfig};
    pub use crate::snapshot::{AgentState, FoodItem, Hazard, HazardSegment, WorldSnapshot};
    pub use glam::Vec2;
}
