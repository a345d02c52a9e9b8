//! Consumer snapshot of the computed map.

use nalgebra::Point3;

/// Row-major snapshot of the map state for external consumers
/// (visualization, logging, downstream planners).
///
/// All arrays have `width * height` entries indexed `y * width + x`.
#[derive(Debug, Clone)]
pub struct GridDump {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Interpolated median height per cell; `+inf` where no
    /// measurement exists
    pub height_values: Vec<f32>,
    /// Maximum height per cell; `-inf` where never touched
    pub max_values: Vec<f32>,
    /// Whether the cell's median came from interpolation
    pub interpolated: Vec<bool>,
    /// Traversability class per cell as a small integer
    pub traversability: Vec<u8>,
    /// World coordinate of the grid center
    pub origin: Point3<f32>,
}
