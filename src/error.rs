//! Error types for BhumiNav

use thiserror::Error;

/// BhumiNav error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Region stamping was asked to operate around a pose that lies
    /// outside the traversability grid. Recenter the map first.
    #[error("pose ({x:.2}, {y:.2}) outside traversability grid centered at ({cx:.2}, {cy:.2})")]
    OutOfGrid { x: f32, y: f32, cx: f32, cy: f32 },

    /// A user-supplied heuristic violated consistency along a tree
    /// edge. This is a defect in the embedding's oracles.
    #[error(
        "heuristic inconsistency: h(parent)={parent_h} > edge cost {edge_cost} + h(child)={child_h}"
    )]
    InconsistentHeuristic {
        parent_h: f32,
        edge_cost: f32,
        child_h: f32,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
