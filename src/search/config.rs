//! Tree search configuration.

use serde::{Deserialize, Serialize};

/// Tree search configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeSearchConf {
    /// Hard cap on the number of tree nodes; reaching it returns the
    /// best result so far
    pub max_tree_size: usize,

    /// Edge length in meters for each expansion step
    pub step_distance: f32,

    /// Maximum number of headings sampled per direction interval
    pub angular_sampling: usize,

    /// Exponential cost discount per depth level, in (0, 1].
    ///
    /// Applied to edge costs only; the heuristic is never rescaled, so
    /// with a discount below 1 the embedding must keep its heuristic a
    /// lower bound of the discounted remaining cost itself.
    pub discount_factor: f32,

    /// Clearance margin handed to the direction oracle (meters)
    pub obstacle_safety_distance: f32,

    /// Robot model radius handed to the direction oracle (meters)
    pub robot_width: f32,
}

impl Default for TreeSearchConf {
    fn default() -> Self {
        Self {
            max_tree_size: 1000,
            step_distance: 0.5,
            angular_sampling: 9,
            discount_factor: 1.0,
            obstacle_safety_distance: 0.1,
            robot_width: 0.5,
        }
    }
}
