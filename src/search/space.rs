//! The oracle seam between the planner and its embedding.

use crate::core::Pose;

use super::node::TreeNode;

/// Capabilities the planner needs from its embedding.
///
/// The planner never sees the map; an embedding implements this trait
/// against a snapshot of its world model and must not mutate that
/// snapshot while an expansion is running. All five operations are
/// expected to be pure with respect to the snapshot.
pub trait SearchSpace {
    /// Has this node reached the goal?
    fn is_terminal(&self, node: &TreeNode) -> bool;

    /// Estimated cost from this node to the best reachable goal.
    ///
    /// Must be admissible: never larger than the actual remaining
    /// cost, and non-negative.
    fn heuristic(&self, node: &TreeNode) -> f32;

    /// Cost of travelling from the node's parent to the node itself.
    /// May include a cost of "being at" the node. Non-negative.
    fn cost_for_node(&self, node: &TreeNode) -> f32;

    /// Angle intervals `(low, high)` of locally admissible world-frame
    /// headings out of `pose`, given the clearance margin and the
    /// robot radius.
    fn next_directions(
        &self,
        pose: &Pose,
        obstacle_safety_dist: f32,
        robot_width: f32,
    ) -> Vec<(f32, f32)>;

    /// Pose the robot would reach by driving `distance` towards
    /// `heading` under its kinematic constraints, or `None` when no
    /// feasible motion exists. Infeasibility silently prunes the
    /// child; it is not an error.
    fn project_pose(&self, pose: &Pose, heading: f32, distance: f32) -> Option<Pose>;
}
