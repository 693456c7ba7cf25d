//! FIFO queue of open nodes.
//!
//! Breadth-first order is what makes the first-found results minimal, so
//! there is no priority here. Alongside the queue we index queued nodes by
//! path label for the rule-3.ii duplicate check.

use std::collections::{HashMap, VecDeque};

use hsdiag_kernel::constraint::ConstraintSet;

use crate::graph::SearchGraph;
use crate::node::{NodeId, NodeStatus};

/// Open-node queue with a path-label index of its members.
#[derive(Debug, Default)]
pub struct OpenQueue {
    queue: VecDeque<NodeId>,
    by_path: HashMap<ConstraintSet, Vec<NodeId>>,
    high_water: usize,
}

impl OpenQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id` (whose path label is `path`) to the back.
    pub fn push(&mut self, id: NodeId, path: &ConstraintSet) {
        self.queue.push_back(id);
        self.by_path.entry(path.clone()).or_default().push(id);
        self.high_water = self.high_water.max(self.queue.len());
    }

    /// Pop the oldest queued node.
    pub fn pop<P>(&mut self, graph: &SearchGraph<P>) -> Option<NodeId> {
        let id = self.queue.pop_front()?;
        if let Ok(node) = graph.node(id) {
            if let Some(ids) = self.by_path.get_mut(node.path_label()) {
                ids.retain(|q| *q != id);
                if ids.is_empty() {
                    self.by_path.remove(node.path_label());
                }
            }
        }
        Some(id)
    }

    /// Rule 3.ii: is some other queued node with the same path label still open?
    ///
    /// Queued nodes that were pruned meanwhile do not count; closing against
    /// them would lose the only live node for that path.
    #[must_use]
    pub fn has_open_duplicate<P>(
        &self,
        graph: &SearchGraph<P>,
        path: &ConstraintSet,
        self_id: NodeId,
    ) -> bool {
        self.by_path.get(path).is_some_and(|ids| {
            ids.iter().any(|&id| {
                id != self_id
                    && graph
                        .node(id)
                        .is_ok_and(|n| n.status() == NodeStatus::Open)
            })
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Largest queue length seen since the last clear.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.by_path.clear();
        self.high_water = 0;
    }
}
