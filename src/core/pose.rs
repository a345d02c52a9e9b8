//! Robot pose representation.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::math::normalize_angle;

/// Robot pose in world coordinates: 3D position plus orientation.
///
/// Coordinate system: ROS REP-103
/// - X: Forward (positive ahead of robot)
/// - Y: Left (positive to robot's left)
/// - Z: Up
/// - Heading: CCW positive about +Z, measured from +X
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Pose {
    /// Position in meters
    pub position: Point3<f32>,
    /// Orientation as a unit quaternion
    pub orientation: UnitQuaternion<f32>,
}

impl Pose {
    /// Create a new pose
    #[inline]
    pub fn new(position: Point3<f32>, orientation: UnitQuaternion<f32>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Create a pose from position only (identity orientation)
    #[inline]
    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            orientation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose with the given heading about the world Z axis
    #[inline]
    pub fn with_heading(position: Point3<f32>, heading: f32) -> Self {
        Self {
            position,
            orientation: UnitQuaternion::from_axis_angle(&Vector3::z_axis(), heading),
        }
    }

    /// Heading of the pose: the orientation projected onto the world
    /// Z axis, i.e. the angle of the rotated X axis in the world XY
    /// plane, normalized to [-π, π].
    #[inline]
    pub fn heading(&self) -> f32 {
        let forward = self.orientation * Vector3::x();
        normalize_angle(forward.y.atan2(forward.x))
    }

    /// Euclidean distance to another pose (position only)
    #[inline]
    pub fn distance(&self, other: &Pose) -> f32 {
        (self.position - other.position).norm()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            orientation: UnitQuaternion::identity(),
        }
    }
}

impl PartialEq for Pose {
    fn eq(&self, other: &Self) -> bool {
        (self.position - other.position).norm() < 1e-6
            && self.orientation.angle_to(&other.orientation) < 1e-6
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_heading_identity() {
        let pose = Pose::from_position(1.0, 2.0, 0.0);
        assert_relative_eq!(pose.heading(), 0.0);
    }

    #[test]
    fn test_heading_roundtrip() {
        for h in [-PI + 0.01, -FRAC_PI_2, 0.0, 1.0, FRAC_PI_2, PI - 0.01] {
            let pose = Pose::with_heading(Point3::origin(), h);
            assert_relative_eq!(pose.heading(), h, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_heading_ignores_roll() {
        // Heading is the projection on the world Z axis, so rolling the
        // body about its forward axis must not change it.
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let roll = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.3);
        let pose = Pose::new(Point3::origin(), yaw * roll);
        assert_relative_eq!(pose.heading(), FRAC_PI_2, epsilon = 1e-5);
    }

    #[test]
    fn test_distance() {
        let a = Pose::from_position(0.0, 0.0, 0.0);
        let b = Pose::from_position(3.0, 4.0, 0.0);
        assert_relative_eq!(a.distance(&b), 5.0);
    }
}
