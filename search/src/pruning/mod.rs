//! Pruning engines: the part of the construction that decides which nodes
//! to close, which labels to reuse, and how new labels change the graph.
//!
//! [`TreePruningEngine`](tree::TreePruningEngine) implements Reiter's closing
//! rules with label reuse. [`DagPruningEngine`](dag::DagPruningEngine) adds
//! node reuse by path label and minimality maintenance.

pub mod dag;
pub mod tree;

use hsdiag_kernel::constraint::{Constraint, ConstraintSet};

use crate::base::HsBase;
use crate::error::HsError;
use crate::frontier::OpenQueue;
use crate::graph::SearchGraph;
use crate::node::NodeId;

/// Which driver produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Tree,
    Dag,
}

impl EngineKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tree => "hs_tree",
            Self::Dag => "hs_dag",
        }
    }
}

/// What expansion did for one arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOutcome {
    /// A fresh node was created. `enqueue` is `false` if it was closed on creation.
    Created { node: NodeId, enqueue: bool },
    /// An existing node with the same path label got an extra parent.
    Reused(NodeId),
}

/// Engine interface the drivers are generic over.
///
/// All hooks take the shared state explicitly; engines own only their
/// indexes, each behind its own lock.
pub trait PruningEngine: Default + Send + Sync {
    fn engine_kind(&self) -> EngineKind;

    /// The tree-level engine (closing rules, reuse, label index).
    fn tree(&self) -> &tree::TreePruningEngine;

    /// `true` if the node must not be labeled: no longer open, deeper than
    /// the depth bound, or closed by rule 3.i/3.ii.
    ///
    /// # Errors
    ///
    /// Propagates graph contract violations.
    fn skip_node<P>(
        &self,
        base: &HsBase,
        graph: &mut SearchGraph<P>,
        open: &OpenQueue,
        id: NodeId,
    ) -> Result<bool, HsError> {
        self.tree().skip_node(base, graph, open, id)
    }

    /// Known labels disjoint from the node's path label.
    ///
    /// # Errors
    ///
    /// Propagates graph contract violations.
    fn reusable_labels<P>(
        &self,
        base: &HsBase,
        graph: &SearchGraph<P>,
        id: NodeId,
    ) -> Result<Vec<ConstraintSet>, HsError> {
        self.tree().reusable_labels(base, graph, id)
    }

    /// Register labels fresh from the labeler. Returns the labels the node
    /// may be labeled with.
    ///
    /// # Errors
    ///
    /// Propagates graph contract violations.
    fn process_labels<P>(
        &self,
        base: &HsBase,
        graph: &mut SearchGraph<P>,
        labels: Vec<ConstraintSet>,
    ) -> Result<Vec<ConstraintSet>, HsError>;

    /// Record that `id` now carries `label`.
    fn add_item_to_label_nodes(&self, label: &ConstraintSet, id: NodeId) {
        self.tree().add_item_to_label_nodes(label, id);
    }

    /// Produce the child of `parent` over `arc`, reusing a node if the engine
    /// supports it. `make_params` is only called when a node is created.
    ///
    /// # Errors
    ///
    /// Labeler errors from `make_params` and graph contract violations.
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
        F: FnOnce(&P) -> Result<P, HsError>;

    /// Drop all indexes.
    fn reset(&self);
}
