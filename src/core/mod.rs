//! Fundamental types: poses, scans, boxes, waypoints, angular math.

pub mod bounds;
pub mod math;
pub mod pose;
pub mod scan;
pub mod waypoint;

pub use bounds::Aabb;
pub use pose::Pose;
pub use scan::{LaserScan, ScanFrame, ScanSource};
pub use waypoint::Waypoint;
