//! Best-first kinodynamic tree search.

use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::PI;

use crate::core::{math::normalize_angle, Pose, Waypoint};

use super::config::TreeSearchConf;
use super::node::{NodeId, TreeNode};
use super::space::SearchSpace;
use super::tree::SearchTree;

/// Angular step used when placing interior heading samples
const ANGULAR_STEP: f32 = PI / 36.0;

/// Queue entry of the best-first expansion.
///
/// Ordered by ascending `heuristic_cost`; the insertion sequence
/// breaks ties FIFO so runs are deterministic.
struct QueueEntry {
    heuristic_cost: f32,
    seq: u64,
    id: NodeId,
}

impl Eq for QueueEntry {}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops its maximum, so both comparisons are
        // flipped: the cheapest heuristic_cost ranks highest, and
        // among equal costs the oldest seq pops first
        other
            .heuristic_cost
            .partial_cmp(&self.heuristic_cost)
            .unwrap_or(Ordering::Equal)
            .then(other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first planner over a kinodynamic search tree.
///
/// Expands (pose, heading) nodes from a start pose, asking a
/// [`SearchSpace`] for admissible headings, kinematic projections,
/// edge costs and the goal test. The expansion is bounded by
/// `max_tree_size`; exhausting the budget degrades gracefully to the
/// best result found so far.
pub struct TreeSearch {
    conf: TreeSearchConf,
    tree: SearchTree,
}

impl TreeSearch {
    pub fn new(conf: TreeSearchConf) -> Self {
        Self {
            conf,
            tree: SearchTree::new(),
        }
    }

    /// Search configuration.
    pub fn conf(&self) -> &TreeSearchConf {
        &self.conf
    }

    /// Replace the search configuration.
    pub fn set_conf(&mut self, conf: TreeSearchConf) {
        self.conf = conf;
    }

    /// The tree generated by the last [`TreeSearch::plan`] call.
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Compute a waypoint sequence from `start` towards the goal
    /// defined by the search space.
    ///
    /// Returns the trajectory to the cheapest goal node found; when no
    /// goal was reached within the node budget, the trajectory to the
    /// most promising leaf (lowest `cost + heuristic`). An empty
    /// vector means not a single feasible expansion existed from the
    /// start.
    pub fn plan<S: SearchSpace>(&mut self, space: &S, start: &Pose) -> Vec<Waypoint> {
        let mut root = TreeNode::new(*start, start.heading());
        root.heuristic = space.heuristic(&root);
        let root_id = self.tree.set_root(root);

        let mut queue: BinaryHeap<QueueEntry> = BinaryHeap::new();
        let mut seq = 0u64;
        queue.push(QueueEntry {
            heuristic_cost: self.tree.node(root_id).heuristic_cost(),
            seq,
            id: root_id,
        });

        let mut best_goal: Option<NodeId> = None;

        loop {
            if self.tree.size() >= self.conf.max_tree_size {
                debug!(
                    "[TreeSearch] node budget {} exhausted, returning best-so-far",
                    self.conf.max_tree_size
                );
                break;
            }
            let entry = match queue.pop() {
                Some(entry) => entry,
                None => break,
            };
            let current_id = entry.id;
            let current = self.tree.node(current_id).clone();
            trace!(
                "[TreeSearch] pop node {} depth {} f={:.3}",
                current_id,
                current.depth,
                current.heuristic_cost()
            );

            if space.is_terminal(&current) {
                let better = match best_goal {
                    Some(goal) => current.cost < self.tree.node(goal).cost,
                    None => true,
                };
                if better {
                    debug!(
                        "[TreeSearch] goal at depth {} cost {:.3}",
                        current.depth, current.cost
                    );
                    best_goal = Some(current_id);
                }
                continue;
            }

            let intervals = space.next_directions(
                &current.pose,
                self.conf.obstacle_safety_distance,
                self.conf.robot_width,
            );
            let discount = self.conf.discount_factor.powi(current.depth as i32);

            for heading in Self::directions_from_intervals(&intervals, self.conf.angular_sampling) {
                let pose = match space.project_pose(&current.pose, heading, self.conf.step_distance)
                {
                    Some(pose) => pose,
                    None => continue, // infeasible, prune silently
                };

                let mut child = TreeNode::new(pose, heading);
                child.depth = current.depth + 1;
                child.cost = current.cost + discount * space.cost_for_node(&child);
                child.heuristic = space.heuristic(&child);

                let heuristic_cost = child.heuristic_cost();
                let child_id = self.tree.add_child(current_id, child);
                seq += 1;
                queue.push(QueueEntry {
                    heuristic_cost,
                    seq,
                    id: child_id,
                });
            }
        }

        if let Some(goal) = best_goal {
            return self.tree.build_trajectory_to(goal);
        }
        if self.tree.size() <= 1 {
            debug!("[TreeSearch] no feasible expansion from start");
            return Vec::new();
        }
        // No goal reached: degrade to the most promising leaf
        match self.best_leaf() {
            Some(leaf) => self.tree.build_trajectory_to(leaf),
            None => Vec::new(),
        }
    }

    /// Leaf with the lowest `cost + heuristic`; earliest-created wins
    /// ties.
    fn best_leaf(&self) -> Option<NodeId> {
        let mut best: Option<(NodeId, f32)> = None;
        for (id, node) in self.tree.iter() {
            if !node.is_leaf {
                continue;
            }
            let f = node.heuristic_cost();
            if best.map_or(true, |(_, best_f)| f < best_f) {
                best = Some((id, f));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Sample concrete headings from the oracle's angle intervals.
    ///
    /// Each interval contributes its endpoints plus at most
    /// `angular_sampling - 2` uniformly spaced interior samples, one
    /// per `ANGULAR_STEP` of interval width. Duplicates are removed by
    /// exact equality, keeping first-seen order.
    fn directions_from_intervals(intervals: &[(f32, f32)], angular_sampling: usize) -> Vec<f32> {
        let mut headings: Vec<f32> = Vec::new();
        let push = |headings: &mut Vec<f32>, angle: f32| {
            let angle = normalize_angle(angle);
            if !headings.iter().any(|h| h.to_bits() == angle.to_bits()) {
                headings.push(angle);
            }
        };

        for &(low, high) in intervals {
            let mut span = high - low;
            if span < 0.0 {
                // Interval wraps the ±π seam
                span += 2.0 * PI;
            }

            push(&mut headings, low);
            let interior = (span / ANGULAR_STEP) as usize;
            let interior = interior.min(angular_sampling.saturating_sub(2));
            for i in 0..interior {
                push(
                    &mut headings,
                    low + span * (i + 1) as f32 / (interior + 1) as f32,
                );
            }
            push(&mut headings, high);
        }
        headings
    }
}
