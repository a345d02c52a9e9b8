//! Laser scan types and the scan input seam.

use nalgebra::{Isometry3, Point3};
use serde::{Deserialize, Serialize};

/// Raw planar laser scan in polar coordinates.
///
/// Beam `i` points at `angle_start + i * angle_step`, rotating CCW
/// about the laser Z axis with X forward. Ranges in meters; a range
/// outside `[range_min, range_max]` or non-finite marks the beam
/// invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserScan {
    /// Angle of beam 0 in radians
    pub angle_start: f32,
    /// Angular step between consecutive beams in radians
    pub angle_step: f32,
    /// Minimum valid range in meters
    pub range_min: f32,
    /// Maximum valid range in meters
    pub range_max: f32,
    /// Range measurements in meters
    pub ranges: Vec<f32>,
}

impl LaserScan {
    /// Create a new laser scan.
    pub fn new(
        angle_start: f32,
        angle_step: f32,
        range_min: f32,
        range_max: f32,
        ranges: Vec<f32>,
    ) -> Self {
        Self {
            angle_start,
            angle_step,
            range_min,
            range_max,
            ranges,
        }
    }

    /// Number of beams.
    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Check if the scan has no beams.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Cartesian point of beam `i` in the laser frame, or `None` for
    /// an invalid beam.
    #[inline]
    pub fn point_from_beam(&self, i: usize) -> Option<Point3<f32>> {
        let range = *self.ranges.get(i)?;
        if !range.is_finite() || range < self.range_min || range > self.range_max {
            return None;
        }
        let angle = self.angle_start + i as f32 * self.angle_step;
        Some(Point3::new(range * angle.cos(), range * angle.sin(), 0.0))
    }

    /// All valid beams as laser-frame points.
    pub fn to_points(&self) -> Vec<Point3<f32>> {
        (0..self.len()).filter_map(|i| self.point_from_beam(i)).collect()
    }
}

/// One scan delivery: the scan plus the transforms valid at capture
/// time.
#[derive(Debug, Clone)]
pub struct ScanFrame {
    pub scan: LaserScan,
    /// Body frame in odometry coordinates
    pub body_to_odo: Isometry3<f32>,
    /// Laser frame in body coordinates
    pub laser_to_body: Isometry3<f32>,
}

/// Source of scan deliveries.
///
/// The mapping pipeline pulls frames from this seam; `None` ends the
/// stream.
pub trait ScanSource {
    fn next_scan(&mut self) -> Option<ScanFrame>;
}
