//! World snapshot consumed by the grid rebuild
//!
//! The host samples its world into these plain-data types once per tick.
//! Nothing here borrows from host state, so a snapshot can be stored,
//! serialized and replayed to reproduce a tick exactly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The navigating agent's own state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AgentState {
    /// World identity; hazards carrying the same id are skipped as self
    pub id: u64,
    /// World position
    pub position: Vec2,
    /// Facing angle in radians
    pub heading: f32,
    /// Collision radius multiplier on the base segment radius
    pub radius_scale: f32,
}

impl AgentState {
    /// Unit vector of the facing angle
    #[must_use]
    pub fn heading_vector(&self) -> Vec2 {
        Vec2::new(self.heading.cos(), self.heading.sin())
    }
}

/// One body segment of a hazard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HazardSegment {
    /// World position
    pub position: Vec2,
    /// Fading out; only a budgeted number of dying segments per rebuild
    /// still count as solid
    pub dying: bool,
}

/// A mobile hazard: a head trailing a chain of body segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    /// World identity
    pub id: u64,
    /// Head position
    pub position: Vec2,
    /// Facing angle in radians
    pub heading: f32,
    /// Collision radius multiplier on the base segment radius
    pub radius_scale: f32,
    /// Body segments in tail-to-head order
    pub segments: Vec<HazardSegment>,
}

impl Hazard {
    /// Unit vector of the facing angle
    #[must_use]
    pub fn heading_vector(&self) -> Vec2 {
        Vec2::new(self.heading.cos(), self.heading.sin())
    }
}

/// A collectible food item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FoodItem {
    /// World position
    pub position: Vec2,
    /// Item size; feeds group scores and, squared, the cell weight
    pub size: f32,
    /// Consumed but not yet removed by the host
    pub eaten: bool,
}

/// Everything the navigation core reads for one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// The agent itself
    pub agent: AgentState,
    /// Every tracked hazard, self included or not
    pub hazards: Vec<Hazard>,
    /// Every tracked food item
    pub food: Vec<FoodItem>,
    /// Host debug flag; enables the per-rebuild summary log line
    pub debug_enabled: bool,
}

impl WorldSnapshot {
    /// Snapshot with no hazards or food
    #[must_use]
    pub fn new(agent: AgentState) -> Self {
        Self {
            agent,
            hazards: Vec::new(),
            food: Vec::new(),
            debug_enabled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_vector() {
        let agent = AgentState {
            id: 1,
            position: Vec2::ZERO,
            heading: std::f32::consts::PI,
            radius_scale: 1.0,
        };
        let v = agent.heading_vector();
        assert!((v.x + 1.0).abs() < 1e-6);
        assert!(v.y.abs() < 1e-6);
    }

    #[test]
    fn test_snapshot_serialization_json() {
        let mut snapshot = WorldSnapshot::new(AgentState {
            id: 42,
            position: Vec2::new(10.0, -5.0),
            heading: 0.5,
            radius_scale: 1.25,
        });
        snapshot.hazards.push(Hazard {
            id: 7,
            position: Vec2::new(100.0, 100.0),
            heading: 1.0,
            radius_scale: 2.0,
            segments: vec![HazardSegment {
                position: Vec2::new(90.0, 100.0),
                dying: true,
            }],
        });
        snapshot.food.push(FoodItem {
            position: Vec2::new(-30.0, 40.0),
            size: 6.0,
            eaten: false,
        });

        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let loaded: WorldSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.agent.id, 42);
        assert_eq!(loaded.agent.position, snapshot.agent.position);
        assert_eq!(loaded.hazards.len(), 1);
        assert!(loaded.hazards[0].segments[0].dying);
        assert_eq!(loaded.food[0].size, 6.0);
    }
}
