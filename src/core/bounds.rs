//! Axis-aligned bounding boxes.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in 3D, closed on both ends.
///
/// Used to mask out scan returns that hit the robot itself (wheels,
/// antenna mounts) before they reach the elevation map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Component-wise lower corner
    pub min: Point3<f32>,
    /// Component-wise upper corner
    pub max: Point3<f32>,
}

impl Aabb {
    /// Create a box from two opposite corners.
    ///
    /// The corners are normalized component-wise, so the argument
    /// order does not matter and the box is never accidentally empty.
    pub fn new(a: Point3<f32>, b: Point3<f32>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Check whether a point lies inside the box (boundary included).
    #[inline]
    pub fn contains(&self, p: &Point3<f32>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}
