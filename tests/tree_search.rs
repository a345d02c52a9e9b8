//! Integration scenarios for the best-first tree search.

use approx::assert_relative_eq;
use bhumi_nav::core::Pose;
use bhumi_nav::search::TreeNode;
use bhumi_nav::{Error, SearchSpace, TreeSearch, TreeSearchConf};
use nalgebra::Vector3;
use std::cell::RefCell;
use std::f32::consts::FRAC_PI_2;

/// A corridor straight up the +Y axis: one admissible heading, unit
/// edge costs, goal line at `goal_y`.
struct CorridorSpace {
    goal_y: f32,
    /// Multiplier on the true remaining distance; above 1 the
    /// heuristic overestimates
    heuristic_scale: f32,
    /// `heuristic_cost` of every node handed to the goal test, in pop
    /// order
    pops: RefCell<Vec<f32>>,
}

impl CorridorSpace {
    fn new(goal_y: f32) -> Self {
        Self {
            goal_y,
            heuristic_scale: 1.0,
            pops: RefCell::new(Vec::new()),
        }
    }
}

impl SearchSpace for CorridorSpace {
    fn is_terminal(&self, node: &TreeNode) -> bool {
        self.pops.borrow_mut().push(node.heuristic_cost());
        node.pose.position.y >= self.goal_y - 1e-4
    }

    fn heuristic(&self, node: &TreeNode) -> f32 {
        self.heuristic_scale * (self.goal_y - node.pose.position.y).max(0.0)
    }

    fn cost_for_node(&self, _node: &TreeNode) -> f32 {
        1.0
    }

    fn next_directions(&self, _pose: &Pose, _safety: f32, _width: f32) -> Vec<(f32, f32)> {
        vec![(FRAC_PI_2, FRAC_PI_2)]
    }

    fn project_pose(&self, pose: &Pose, heading: f32, distance: f32) -> Option<Pose> {
        let step = Vector3::new(heading.cos(), heading.sin(), 0.0) * distance;
        Some(Pose::with_heading(pose.position + step, heading))
    }
}

fn corridor_conf(max_tree_size: usize) -> TreeSearchConf {
    TreeSearchConf {
        max_tree_size,
        step_distance: 1.0,
        angular_sampling: 9,
        discount_factor: 1.0,
        ..Default::default()
    }
}

#[test]
fn straight_line_reaches_goal() {
    let space = CorridorSpace::new(10.0);
    let mut search = TreeSearch::new(corridor_conf(20));

    let waypoints = search.plan(&space, &Pose::from_position(0.0, 0.0, 0.0));

    assert_eq!(waypoints.len(), 11);
    assert_relative_eq!(waypoints[0].position.y, 0.0);
    let last = waypoints.last().unwrap();
    assert_relative_eq!(last.position.x, 0.0, epsilon = 1e-4);
    assert_relative_eq!(last.position.y, 10.0, epsilon = 1e-4);

    // Consecutive waypoints are one step apart
    for pair in waypoints.windows(2) {
        let gap = (pair[1].position - pair[0].position).norm();
        assert_relative_eq!(gap, 1.0, epsilon = 1e-4);
    }

    // The recorded goal carries the undiscounted cost sum
    let tree = search.tree();
    let goal_cost = tree
        .iter()
        .find(|(_, n)| n.pose.position.y >= 10.0 - 1e-4)
        .map(|(_, n)| n.cost)
        .unwrap();
    assert_relative_eq!(goal_cost, 10.0, epsilon = 1e-4);
}

#[test]
fn node_budget_returns_best_so_far() {
    let space = CorridorSpace::new(10.0);
    let mut search = TreeSearch::new(corridor_conf(5));

    let waypoints = search.plan(&space, &Pose::from_position(0.0, 0.0, 0.0));

    // Five nodes were allowed, so the path ends at the deepest leaf
    assert_eq!(waypoints.len(), 5);
    assert_relative_eq!(waypoints.last().unwrap().position.y, 4.0, epsilon = 1e-4);
    assert_eq!(search.tree().size(), 5);
}

#[test]
fn pop_order_is_monotone_in_heuristic_cost() {
    let space = CorridorSpace::new(8.0);
    let mut search = TreeSearch::new(corridor_conf(30));
    search.plan(&space, &Pose::from_position(0.0, 0.0, 0.0));

    let pops = space.pops.borrow();
    assert!(!pops.is_empty());
    for pair in pops.windows(2) {
        assert!(
            pair[1] >= pair[0] - 1e-4,
            "pop order regressed: {} after {}",
            pair[1],
            pair[0]
        );
    }
}

#[test]
fn tree_size_matches_reachable_nodes() {
    let space = CorridorSpace::new(6.0);
    let mut search = TreeSearch::new(corridor_conf(50));
    search.plan(&space, &Pose::from_position(0.0, 0.0, 0.0));

    let tree = search.tree();
    assert_eq!(tree.iter().count(), tree.size());
    for (_, node) in tree.iter() {
        if let Some(parent) = node.parent {
            assert!(tree.get(parent).is_some(), "dangling parent link");
        } else {
            assert!(node.is_root());
        }
    }
}

#[test]
fn inadmissible_heuristic_fails_consistency_audit() {
    let mut space = CorridorSpace::new(6.0);
    space.heuristic_scale = 2.0;
    let mut search = TreeSearch::new(corridor_conf(30));
    search.plan(&space, &Pose::from_position(0.0, 0.0, 0.0));

    let tree = search.tree();
    let (deepest, _) = tree
        .iter()
        .max_by_key(|(_, n)| n.depth)
        .expect("tree is non-empty");
    let err = tree.verify_heuristic_consistency(deepest).unwrap_err();
    assert!(matches!(err, Error::InconsistentHeuristic { .. }));
}

#[test]
fn admissible_heuristic_passes_consistency_audit() {
    let space = CorridorSpace::new(6.0);
    let mut search = TreeSearch::new(corridor_conf(30));
    search.plan(&space, &Pose::from_position(0.0, 0.0, 0.0));

    let tree = search.tree();
    let (deepest, _) = tree
        .iter()
        .max_by_key(|(_, n)| n.depth)
        .expect("tree is non-empty");
    assert!(tree.verify_heuristic_consistency(deepest).is_ok());
}

#[test]
fn discount_factor_deweights_deep_edges() {
    let space = CorridorSpace::new(3.0);
    let mut conf = corridor_conf(20);
    conf.discount_factor = 0.5;
    let mut search = TreeSearch::new(conf);
    search.plan(&space, &Pose::from_position(0.0, 0.0, 0.0));

    // Edge costs 1, 0.5, 0.25 accumulate along the three-step path
    let goal_cost = search
        .tree()
        .iter()
        .find(|(_, n)| n.pose.position.y >= 3.0 - 1e-4)
        .map(|(_, n)| n.cost)
        .unwrap();
    assert_relative_eq!(goal_cost, 1.75, epsilon = 1e-4);
}

/// A space that refuses every expansion.
struct DeadEndSpace {
    give_intervals: bool,
}

impl SearchSpace for DeadEndSpace {
    fn is_terminal(&self, _node: &TreeNode) -> bool {
        false
    }

    fn heuristic(&self, _node: &TreeNode) -> f32 {
        1.0
    }

    fn cost_for_node(&self, _node: &TreeNode) -> f32 {
        1.0
    }

    fn next_directions(&self, _pose: &Pose, _safety: f32, _width: f32) -> Vec<(f32, f32)> {
        if self.give_intervals {
            vec![(0.0, 1.0)]
        } else {
            Vec::new()
        }
    }

    fn project_pose(&self, _pose: &Pose, _heading: f32, _distance: f32) -> Option<Pose> {
        None
    }
}

#[test]
fn no_admissible_headings_yields_empty_result() {
    let space = DeadEndSpace {
        give_intervals: false,
    };
    let mut search = TreeSearch::new(corridor_conf(20));
    let waypoints = search.plan(&space, &Pose::from_position(0.0, 0.0, 0.0));
    assert!(waypoints.is_empty());
}

#[test]
fn infeasible_projections_yield_empty_result() {
    let space = DeadEndSpace {
        give_intervals: true,
    };
    let mut search = TreeSearch::new(corridor_conf(20));
    let waypoints = search.plan(&space, &Pose::from_position(0.0, 0.0, 0.0));
    assert!(waypoints.is_empty());
}

#[test]
fn terminal_start_returns_single_waypoint() {
    let space = CorridorSpace::new(0.0);
    let mut search = TreeSearch::new(corridor_conf(20));
    let waypoints = search.plan(&space, &Pose::from_position(0.0, 0.0, 0.0));

    assert_eq!(waypoints.len(), 1);
    assert_relative_eq!(waypoints[0].position.y, 0.0);
}

/// Fan-out space with several admissible headings and a goal line to
/// the east, to exercise branching expansions.
struct FanSpace {
    goal_x: f32,
}

impl SearchSpace for FanSpace {
    fn is_terminal(&self, node: &TreeNode) -> bool {
        node.pose.position.x >= self.goal_x - 1e-4
    }

    fn heuristic(&self, node: &TreeNode) -> f32 {
        (self.goal_x - node.pose.position.x).max(0.0)
    }

    fn cost_for_node(&self, _node: &TreeNode) -> f32 {
        1.0
    }

    fn next_directions(&self, _pose: &Pose, _safety: f32, _width: f32) -> Vec<(f32, f32)> {
        vec![(-0.4, 0.4)]
    }

    fn project_pose(&self, pose: &Pose, heading: f32, distance: f32) -> Option<Pose> {
        let step = Vector3::new(heading.cos(), heading.sin(), 0.0) * distance;
        Some(Pose::with_heading(pose.position + step, heading))
    }
}

#[test]
fn branching_search_finds_goal_within_budget() {
    let space = FanSpace { goal_x: 3.0 };
    let mut search = TreeSearch::new(TreeSearchConf {
        max_tree_size: 200,
        step_distance: 1.0,
        angular_sampling: 3,
        discount_factor: 1.0,
        ..Default::default()
    });

    let waypoints = search.plan(&space, &Pose::from_position(0.0, 0.0, 0.0));

    assert!(!waypoints.is_empty());
    assert!(waypoints.last().unwrap().position.x >= 3.0 - 1e-4);
    // The straight heading is cheapest: three steps plus the start
    assert_eq!(waypoints.len(), 4);
    // The budget stops expansion; one expansion may overshoot it
    assert!(search.tree().size() <= 200 + 2);
}
