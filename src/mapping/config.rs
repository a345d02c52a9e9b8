//! Configuration types for the mapping pipeline.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::core::Aabb;
use crate::error::{Error, Result};

/// Grid dimensions shared by the elevation and traversability grids.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid width in cells
    pub width: usize,

    /// Grid height in cells
    pub height: usize,

    /// Meters per cell
    pub resolution: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 600,  // 30m at 5cm
            height: 600, // 30m at 5cm
            resolution: 0.05,
        }
    }
}

/// Full mapping pipeline configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapConfig {
    /// Grid dimensions and resolution
    pub grid: GridConfig,

    /// Distance from the grid edge at which the grid recenters (meters)
    pub boundary_size: f32,

    /// Step height above which a cell pair is an obstacle (meters)
    pub max_step_size: f32,

    /// Body-frame boxes whose scan returns are discarded (robot
    /// self-hits such as the wheels)
    pub masked_areas: Vec<Aabb>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            boundary_size: 1.0,
            max_step_size: 0.2,
            masked_areas: vec![
                // Left and right wheel footprints
                Aabb::new(
                    Point3::new(0.225, -0.215, -0.18),
                    Point3::new(0.285, 0.215, 0.25),
                ),
                Aabb::new(
                    Point3::new(-0.285, -0.215, -0.18),
                    Point3::new(-0.225, 0.215, 0.25),
                ),
            ],
        }
    }
}

impl MapConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &std::path::Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::Config(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: &std::path::Path) -> Result<()> {
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }
}
