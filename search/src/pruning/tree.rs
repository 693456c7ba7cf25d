//! Tree-level pruning: closing rules 3.i and 3.ii, label reuse, and the
//! `label -> nodes` index.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::trace;

use hsdiag_kernel::constraint::{has_intersection, Constraint, ConstraintSet};

use crate::base::HsBase;
use crate::error::HsError;
use crate::frontier::OpenQueue;
use crate::graph::SearchGraph;
use crate::node::{NodeId, NodeStatus};
use crate::stats::Counter;

use super::{ChildOutcome, EngineKind, PruningEngine};

/// Pruning for HS-Tree. Every expansion creates a fresh node.
#[derive(Debug, Default)]
pub struct TreePruningEngine {
    label_nodes: Mutex<HashMap<ConstraintSet, Vec<NodeId>>>,
}

impl TreePruningEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item_to_label_nodes(&self, label: &ConstraintSet, id: NodeId) {
        let mut index = self.label_nodes.lock();
        let nodes = index.entry(label.clone()).or_default();
        if !nodes.contains(&id) {
            nodes.push(id);
        }
        trace!(node = %id, entries = index.len(), "label index updated");
    }

    /// Nodes currently recorded as carrying `label`.
    #[must_use]
    pub fn nodes_with_label(&self, label: &ConstraintSet) -> Vec<NodeId> {
        self.label_nodes
            .lock()
            .get(label)
            .cloned()
            .unwrap_or_default()
    }

    /// Forget the index entries of the given labels.
    pub fn remove_labels<'a, I>(&self, labels: I)
    where
        I: IntoIterator<Item = &'a ConstraintSet>,
    {
        let mut index = self.label_nodes.lock();
        for label in labels {
            index.remove(label);
        }
    }

    /// Every recorded node label disjoint from the node's path label, in
    /// registry order.
    ///
    /// # Errors
    ///
    /// [`HsError::Graph`] if `id` is unknown.
    pub fn reusable_labels<P>(
        &self,
        base: &HsBase,
        graph: &SearchGraph<P>,
        id: NodeId,
    ) -> Result<Vec<ConstraintSet>, HsError> {
        let path = graph.node(id)?.path_label();
        let labels: Vec<ConstraintSet> = base
            .node_labels()
            .snapshot()
            .into_iter()
            .filter(|label| !has_intersection(label, path))
            .collect();
        if !labels.is_empty() {
            base.stats().incr(Counter::ReusedLabels);
            trace!(node = %id, candidates = labels.len(), "reusing label");
        }
        Ok(labels)
    }

    /// See [`PruningEngine::skip_node`].
    ///
    /// # Errors
    ///
    /// [`HsError::Graph`] if `id` is unknown.
    pub fn skip_node<P>(
        &self,
        base: &HsBase,
        graph: &mut SearchGraph<P>,
        open: &OpenQueue,
        id: NodeId,
    ) -> Result<bool, HsError> {
        let node = graph.node(id)?;
        if node.status() != NodeStatus::Open {
            return Ok(true);
        }
        if let Some(limit) = base.policy().depth_limit() {
            if node.level() > limit {
                base.stats().incr(Counter::DepthSkipped);
                trace!(node = %id, level = node.level(), limit, "beyond depth bound");
                return Ok(true);
            }
        }
        self.can_prune(base, graph, open, id)
    }

    /// Apply rules 3.i and 3.ii, closing the node if either fires.
    ///
    /// # Errors
    ///
    /// [`HsError::Graph`] if `id` is unknown.
    pub fn can_prune<P>(
        &self,
        base: &HsBase,
        graph: &mut SearchGraph<P>,
        open: &OpenQueue,
        id: NodeId,
    ) -> Result<bool, HsError> {
        let path = graph.node(id)?.path_label();
        let rule = if base.path_labels().any_subset_of(path) {
            Counter::Closed3i
        } else if open.has_open_duplicate(graph, path, id) {
            Counter::Closed3ii
        } else {
            return Ok(false);
        };
        graph.set_status(id, NodeStatus::Closed)?;
        base.stats().incr(rule);
        trace!(node = %id, rule = ?rule, "closed");
        Ok(true)
    }
}

impl PruningEngine for TreePruningEngine {
    fn engine_kind(&self) -> EngineKind {
        EngineKind::Tree
    }

    fn tree(&self) -> &TreePruningEngine {
        self
    }

    fn process_labels<P>(
        &self,
        base: &HsBase,
        _graph: &mut SearchGraph<P>,
        labels: Vec<ConstraintSet>,
    ) -> Result<Vec<ConstraintSet>, HsError> {
        let labels = base.cap_to_budget(labels);
        base.add_node_labels(&labels);
        Ok(labels)
    }

    fn attach_child<P, F>(
        &self,
        base: &HsBase,
        graph: &mut SearchGraph<P>,
        open: &OpenQueue,
        parent: NodeId,
        arc: &Constraint,
        make_params: F,
    ) -> Result<ChildOutcome, HsError>
    where
        F: FnOnce(&P) -> Result<P, HsError>,
    {
        let params = make_params(graph.node(parent)?.parameters())?;
        let node = graph.add_child(parent, arc.clone(), params)?;
        base.stats().incr(Counter::ConstructedNodes);
        trace!(parent = %parent, node = %node, arc = %arc, "node created");
        let enqueue = !self.can_prune(base, graph, open, node)?;
        Ok(ChildOutcome::Created { node, enqueue })
    }

    fn reset(&self) {
        self.label_nodes.lock().clear();
    }
}
