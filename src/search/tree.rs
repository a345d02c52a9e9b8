//! Search tree storage.

use crate::core::Waypoint;
use crate::error::{Error, Result};

use super::node::{NodeId, TreeNode};

struct Slot {
    node: TreeNode,
    children: Vec<NodeId>,
}

/// Arena-backed tree of search nodes.
///
/// The tree owns every node; parent links are plain indices, so there
/// is no ownership cycle to manage. Since a tree can get quite big,
/// the live-node count is kept up to date incrementally instead of
/// being recounted.
#[derive(Default)]
pub struct SearchTree {
    slots: Vec<Option<Slot>>,
    root: Option<NodeId>,
    size: usize,
}

impl SearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new root, discarding any previous tree.
    pub fn set_root(&mut self, node: TreeNode) -> NodeId {
        self.clear();
        self.slots.push(Some(Slot {
            node,
            children: Vec::new(),
        }));
        self.root = Some(0);
        self.size = 1;
        0
    }

    /// Attach `node` as a child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, mut node: TreeNode) -> NodeId {
        node.parent = Some(parent);
        node.is_leaf = true;
        let id = self.slots.len();
        self.slots.push(Some(Slot {
            node,
            children: Vec::new(),
        }));

        let parent_slot = self.slot_mut(parent);
        parent_slot.children.push(id);
        parent_slot.node.is_leaf = false;

        self.size += 1;
        id
    }

    /// Remove a node and its entire subtree (post-order).
    pub fn remove_subtree(&mut self, id: NodeId) {
        let parent = self.slot(id).node.parent;

        let mut stack = vec![id];
        let mut order = Vec::new();
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend_from_slice(&self.slot(current).children);
        }
        for dead in order.into_iter().rev() {
            self.slots[dead] = None;
            self.size -= 1;
        }

        match parent {
            Some(parent) => {
                let parent_slot = self.slot_mut(parent);
                parent_slot.children.retain(|&c| c != id);
                parent_slot.node.is_leaf = parent_slot.children.is_empty();
            }
            None => self.root = None,
        }
    }

    /// Borrow a node. Panics on a stale id, which is a programming
    /// error: ids are only ever produced by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.slot(id).node
    }

    /// Mutably borrow a node.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.slot_mut(id).node
    }

    /// Borrow a node if the id is still live.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.slots.get(id)?.as_ref().map(|s| &s.node)
    }

    /// Root id, if a tree has been built.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of live nodes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Drop all nodes.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.root = None;
        self.size = 0;
    }

    /// Iterate over live nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, s)| s.as_ref().map(|s| (id, &s.node)))
    }

    /// Waypoint sequence from the root to `leaf`, root included.
    pub fn build_trajectory_to(&self, leaf: NodeId) -> Vec<Waypoint> {
        let mut waypoints = Vec::new();
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.node(id);
            waypoints.push(Waypoint {
                position: node.pose.position,
                heading: node.pose.heading(),
                position_tolerance: node.position_tolerance,
                heading_tolerance: node.heading_tolerance,
            });
            current = node.parent;
        }
        waypoints.reverse();
        waypoints
    }

    /// Check heuristic consistency along the chain from `from` up to
    /// the root: `h(parent) <= edge_cost + h(child)` for every edge.
    ///
    /// A violation means the embedding's heuristic overestimates and
    /// the expansion order is no longer optimal. Not recoverable here.
    pub fn verify_heuristic_consistency(&self, from: NodeId) -> Result<()> {
        let mut child_id = from;
        while let Some(parent_id) = self.node(child_id).parent {
            let child = self.node(child_id);
            let parent = self.node(parent_id);
            let edge_cost = child.cost - parent.cost;
            if parent.heuristic > edge_cost + child.heuristic + 1e-5 {
                return Err(Error::InconsistentHeuristic {
                    parent_h: parent.heuristic,
                    edge_cost,
                    child_h: child.heuristic,
                });
            }
            child_id = parent_id;
        }
        Ok(())
    }

    #[inline]
    fn slot(&self, id: NodeId) -> &Slot {
        match &self.slots[id] {
            Some(slot) => slot,
            None => panic!("stale node id {id}"),
        }
    }

    #[inline]
    fn slot_mut(&mut self, id: NodeId) -> &mut Slot {
        match &mut self.slots[id] {
            Some(slot) => slot,
            None => panic!("stale node id {id}"),
        }
    }
}
