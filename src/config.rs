//! Runtime configuration
//!
//! One [`NavConfig`] tree covers the grid window, threat weighting, food
//! bucketing, path search and radar. Configs serialize to RON or JSON so a
//! tuning run can be saved and replayed.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::search::{Heuristic, SearchConfig};

/// Collision window and threat weighting parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Window width in cells
    pub width: usize,
    /// Window height in cells
    pub height: usize,
    /// Cell edge length in world units
    pub cell_size: f32,
    /// Weight of a plain empty cell
    pub default_cell_weight: f32,
    /// Collision radius of a body part at scale 1.0
    pub base_segment_radius: f32,
    /// Lower bound on the radius used for threat rings
    pub min_hazard_radius: f32,
    /// Ring radius multiplier for hazard heads
    pub head_radius_scale: f32,
    /// Penalty weights of the three inner ring bands, nearest first
    pub ring_weights: [f32; 3],
    /// Penalty weight of the outermost band
    pub baseline_weight: f32,
    /// Dying segments still treated as solid per rebuild
    pub dying_segment_budget: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 40,
            cell_size: 20.0,
            default_cell_weight: 1000.0,
            base_segment_radius: 14.5,
            min_hazard_radius: 20.0,
            head_radius_scale: 2.0,
            ring_weights: [5000.0, 3000.0, 2000.0],
            baseline_weight: 1500.0,
            dying_segment_budget: 3,
        }
    }
}

/// Coarse food bucketing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodConfig {
    /// Bucket grid width and height in buckets
    pub bucket_grid_size: usize,
    /// Bucket edge length in world units
    pub bucket_cell_size: f32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            bucket_grid_size: 10,
            bucket_cell_size: 100.0,
        }
    }
}

/// Radar sweep parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RadarConfig {
    /// Angular step between bearings in degrees; clamped to at least 1
    pub step_degrees: usize,
    /// Cast length in world units
    pub scan_distance: f32,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            step_degrees: 10,
            scan_distance: 1000.0,
        }
    }
}

/// The full navigation configuration tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavConfig {
    /// Collision window and threat weighting
    pub grid: GridConfig,
    /// Coarse food bucketing
    pub food: FoodConfig,
    /// Path search defaults
    pub search: SearchConfig,
    /// Radar sweep defaults
    pub radar: RadarConfig,
}

impl NavConfig {
    /// Create a configuration with all defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the window size in cells
    #[must_use]
    pub fn with_grid_dimensions(mut self, width: usize, height: usize) -> Self {
        self.grid.width = width;
        self.grid.height = height;
        self
    }

    /// Set the cell edge length in world units
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.grid.cell_size = cell_size;
        self
    }

    /// Set the path search heuristic
    #[must_use]
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.search.heuristic = heuristic;
        self
    }

    /// Set the path search iteration cap
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.search.max_iterations = max_iterations;
        self
    }

    /// Set the radar cast length in world units
    #[must_use]
    pub fn with_scan_distance(mut self, scan_distance: f32) -> Self {
        self.radar.scan_distance = scan_distance;
        self
    }

    /// Save the configuration to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a configuration from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: NavConfig =
            ron::from_str(&content).map_err(|e| ConfigError::DeserializeError(e.to_string()))?;
        Ok(config)
    }

    /// Save the configuration to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: NavConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::DeserializeError(e.to_string()))?;
        Ok(config)
    }
}

/// Errors that can occur loading or saving configurations
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
