//! Map representation: sliding grids of elevation and traversability
//! cells.

pub mod cell;
pub mod elevation;
pub mod sliding;
pub mod traversability;

pub use cell::ElevationCell;
pub use elevation::ElevationGrid;
pub use sliding::SlidingGrid;
pub use traversability::{Traversability, TraversabilityGrid};
