//! Trajectory waypoints produced by the planner.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A single waypoint of a planned trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position in world coordinates (meters)
    pub position: Point3<f32>,
    /// Heading in radians, CCW positive from +X
    pub heading: f32,
    /// How far the follower may deviate from the position (meters)
    pub position_tolerance: f32,
    /// How far the follower may deviate from the heading (radians)
    pub heading_tolerance: f32,
}

impl Waypoint {
    pub fn new(position: Point3<f32>, heading: f32) -> Self {
        Self {
            position,
            heading,
            position_tolerance: 0.0,
            heading_tolerance: 0.0,
        }
    }
}
