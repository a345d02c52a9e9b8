//! Map pipeline: scan ingest, interpolation, classification, region
//! stamping and consumer snapshots.

pub mod config;
pub mod dump;
pub mod pipeline;

pub use config::{GridConfig, MapConfig};
pub use dump::GridDump;
pub use pipeline::MapPipeline;
