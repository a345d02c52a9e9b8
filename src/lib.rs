//! # Bhumi-Nav: Terrain Mapping & Tree-Search Planning
//!
//! A navigation library for ground robots sensing terrain with a
//! planar laser scanner. It couples two components:
//!
//! - a **traversability map pipeline**: a sliding, world-fixed grid
//!   that ingests range scans, computes a robust per-cell elevation
//!   and classifies cells by a local step-height criterion
//! - a **kinodynamic tree search**: a best-first expansion over
//!   (pose, heading) nodes scored by cost plus an admissible
//!   heuristic, with child generation driven by oracles supplied by
//!   the embedding
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bhumi_nav::{MapConfig, MapPipeline};
//! use bhumi_nav::core::LaserScan;
//! use nalgebra::Isometry3;
//!
//! let mut pipeline = MapPipeline::new(MapConfig::default());
//!
//! // Feed scans as they arrive; recompute when motion warrants it
//! let scan = LaserScan::new(-1.5, 0.01, 0.1, 20.0, vec![2.0; 300]);
//! if pipeline.ingest(&scan, &Isometry3::identity(), &Isometry3::identity()) {
//!     pipeline.compute_new_map();
//! }
//! let dump = pipeline.grid_dump();
//! println!("map origin: {:.2}, {:.2}", dump.origin.x, dump.origin.y);
//! ```
//!
//! ## Coordinate Frame
//!
//! All coordinates follow the ROS REP-103 convention:
//! - **X-forward**, **Y-left**, **Z-up**
//! - Headings in radians, counter-clockwise positive from +X
//!
//! ## Architecture
//!
//! The library is organized into modules:
//!
//! - [`core`]: Fundamental types (Pose, LaserScan, Aabb, Waypoint)
//! - [`grid`]: Sliding grids of elevation and traversability cells
//! - [`mapping`]: The scan-to-map pipeline and its configuration
//! - [`search`]: The search tree, oracle seam and best-first planner
//!
//! ## Data Flow
//!
//! ```text
//!   ┌──────────────┐   mask + transform   ┌────────────────┐
//!   │  LaserScan   │ ───────────────────► │ ElevationGrid  │
//!   │ (ScanSource) │                      │  (raw samples) │
//!   └──────────────┘                      └───────┬────────┘
//!                                                 │ smooth_into()
//!                                                 ▼
//!                                         ┌────────────────┐
//!                                         │ ElevationGrid  │
//!                                         │ (interpolated) │
//!                                         └───────┬────────┘
//!                                                 │ classify_from()
//!                                                 ▼
//!   ┌──────────────┐      oracles         ┌────────────────────┐
//!   │  TreeSearch  │ ◄─────────────────── │ TraversabilityGrid │
//!   │ (SearchSpace)│                      │   (step heights)   │
//!   └──────┬───────┘                      └────────────────────┘
//!          │ plan()
//!          ▼
//!   ┌──────────────┐
//!   │  Waypoints   │
//!   └──────────────┘
//! ```
//!
//! The planner never touches the map directly: the embedding wraps its
//! map snapshot in a [`SearchSpace`] implementation, which keeps the
//! search core independent of the map representation.

pub mod core;
pub mod error;
pub mod grid;
pub mod mapping;
pub mod search;

// Re-export main types at crate root
pub use crate::core::{Aabb, LaserScan, Pose, ScanFrame, ScanSource, Waypoint};
pub use error::{Error, Result};
pub use grid::{ElevationCell, ElevationGrid, SlidingGrid, Traversability, TraversabilityGrid};
pub use mapping::{GridConfig, GridDump, MapConfig, MapPipeline};
pub use search::{SearchSpace, SearchTree, TreeNode, TreeSearch, TreeSearchConf};
