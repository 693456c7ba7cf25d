//! DAG-level pruning: node reuse by path label and minimality maintenance.
//!
//! Labelers driving an HS-DAG may return non-minimal labels. Whenever fresh
//! labels arrive they are compared against every known label; dominated
//! labels leave the registry, and open nodes that carried a dominated label
//! are relabeled with the smaller one. Children hanging off arcs that are no
//! longer in the label are detached and their subgraph cleaned up.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use tracing::{debug, trace};

use hsdiag_kernel::constraint::{difference, with_element, Constraint, ConstraintSet, SetDisplay};

use crate::base::HsBase;
use crate::error::HsError;
use crate::frontier::OpenQueue;
use crate::graph::SearchGraph;
use crate::node::{NodeId, NodeStatus};
use crate::stats::Counter;

use super::tree::TreePruningEngine;
use super::{ChildOutcome, EngineKind, PruningEngine};

/// Pruning for HS-DAG.
///
/// Lock order: `maintenance` before `nodes_lookup` before the tree engine's
/// label index. `nodes_lookup` is released before child parameters are
/// derived, so no lock is held across a labeler call.
#[derive(Debug, Default)]
pub struct DagPruningEngine {
    tree: TreePruningEngine,
    nodes_lookup: Mutex<HashMap<ConstraintSet, NodeId>>,
    maintenance: Mutex<()>,
}

impl DagPruningEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The node registered for `path`, if any.
    #[must_use]
    pub fn lookup(&self, path: &ConstraintSet) -> Option<NodeId> {
        self.nodes_lookup.lock().get(path).copied()
    }

    /// Replace `greater` by `smaller` on every open node carrying it.
    fn relabel<P>(
        &self,
        base: &HsBase,
        graph: &mut SearchGraph<P>,
        greater: &ConstraintSet,
        smaller: &ConstraintSet,
    ) -> Result<(), HsError> {
        let stale_arcs = difference(greater, smaller);
        for id in self.tree.nodes_with_label(greater) {
            if graph.node(id)?.status() != NodeStatus::Open {
                continue;
            }
            base.stats().incr(Counter::PruningEvents);
            debug!(
                node = %id,
                from = %SetDisplay(greater),
                to = %SetDisplay(smaller),
                "relabeling node with smaller label"
            );
            graph.set_label(id, smaller.clone())?;
            self.tree.add_item_to_label_nodes(smaller, id);
            for arc in &stale_arcs {
                if let Some(child) = graph.detach_child(id, arc)? {
                    self.clean_up(base, graph, child)?;
                }
            }
        }
        Ok(())
    }

    /// Remove an orphaned node and everything only it kept alive.
    ///
    /// A node that still has another parent is left untouched.
    fn clean_up<P>(
        &self,
        base: &HsBase,
        graph: &mut SearchGraph<P>,
        start: NodeId,
    ) -> Result<(), HsError> {
        let mut pending = vec![start];
        while let Some(id) = pending.pop() {
            let node = graph.node(id)?;
            if node.is_root() || !node.parents().is_empty() {
                continue;
            }
            {
                let mut lookup = self.nodes_lookup.lock();
                if lookup.get(node.path_label()) == Some(&id) {
                    lookup.remove(node.path_label());
                }
            }
            if node.status() == NodeStatus::Open {
                graph.set_status(id, NodeStatus::Pruned)?;
                base.stats().incr(Counter::CleanedNodes);
                trace!(node = %id, "pruned");
            }
            let arcs: Vec<Constraint> = graph.node(id)?.children().keys().cloned().collect();
            for arc in &arcs {
                if let Some(child) = graph.detach_child(id, arc)? {
                    pending.push(child);
                }
            }
        }
        Ok(())
    }
}

impl PruningEngine for DagPruningEngine {
    fn engine_kind(&self) -> EngineKind {
        EngineKind::Dag
    }

    fn tree(&self) -> &TreePruningEngine {
        &self.tree
    }

    /// Minimality maintenance. Runs entirely under the maintenance lock.
    ///
    /// Returns the surviving fresh labels. If every fresh label was
    /// dominated, returns the known labels that dominated them instead so the
    /// node still gets a valid label.
    fn process_labels<P>(
        &self,
        base: &HsBase,
        graph: &mut SearchGraph<P>,
        labels: Vec<ConstraintSet>,
    ) -> Result<Vec<ConstraintSet>, HsError> {
        let _pass = self.maintenance.lock();

        let mut fresh: Vec<ConstraintSet> = Vec::with_capacity(labels.len());
        for label in labels {
            if !fresh.contains(&label) {
                fresh.push(label);
            }
        }
        let existing = base.node_labels().snapshot();
        let mut non_min: HashSet<ConstraintSet> = HashSet::new();
        let mut known: HashSet<ConstraintSet> = HashSet::new();
        let mut replacements: Vec<ConstraintSet> = Vec::new();
        let mut replacing: HashSet<ConstraintSet> = HashSet::new();

        for fs in &existing {
            if non_min.contains(fs) {
                continue;
            }
            for l in &fresh {
                if non_min.contains(l) || known.contains(l) {
                    continue;
                }
                if fs == l {
                    known.insert(l.clone());
                    if !replacements.contains(fs) {
                        replacements.push(fs.clone());
                    }
                    continue;
                }
                let fs_is_greater = fs.len() > l.len();
                let (greater, smaller) = if fs_is_greater { (fs, l) } else { (l, fs) };
                if !smaller.is_subset(greater) {
                    continue;
                }
                non_min.insert(greater.clone());
                if fs_is_greater {
                    self.relabel(base, graph, greater, smaller)?;
                    replacing.insert(l.clone());
                    break;
                }
                if !replacements.contains(fs) {
                    replacements.push(fs.clone());
                }
            }
        }

        // Fresh labels may also dominate each other.
        for (i, a) in fresh.iter().enumerate() {
            if non_min.contains(a) || known.contains(a) {
                continue;
            }
            let dominated = fresh.iter().enumerate().any(|(j, b)| {
                i != j && !non_min.contains(b) && b.len() < a.len() && b.is_subset(a)
            });
            if dominated {
                non_min.insert(a.clone());
            }
        }

        if !non_min.is_empty() {
            let dropped = base.node_labels().retain(|s| !non_min.contains(s));
            self.tree.remove_labels(non_min.iter());
            debug!(dropped, "removed non-minimal labels");
        }

        let mut survivors: Vec<ConstraintSet> = fresh
            .into_iter()
            .filter(|l| !non_min.contains(l) && !known.contains(l))
            .collect();
        // Labels now carried by relabeled nodes are always recorded; the
        // rest share whatever the threshold leaves.
        let reserved = survivors.iter().filter(|l| replacing.contains(*l)).count();
        let mut room = base
            .node_label_budget()
            .map(|budget| budget.saturating_sub(reserved));
        survivors.retain(|l| {
            if replacing.contains(l) {
                return true;
            }
            match room.as_mut() {
                None => true,
                Some(0) => false,
                Some(left) => {
                    *left -= 1;
                    true
                }
            }
        });
        base.add_node_labels(&survivors);
        if survivors.is_empty() {
            replacements.retain(|r| !non_min.contains(r));
            return Ok(replacements);
        }
        Ok(survivors)
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
        let path = with_element(graph.node(parent)?.path_label(), arc);
        if let Some(existing) = self.lookup(&path) {
            graph.add_parent(existing, parent, arc.clone())?;
            base.stats().incr(Counter::ReusedNodes);
            trace!(parent = %parent, node = %existing, arc = %arc, "node reused");
            return Ok(ChildOutcome::Reused(existing));
        }
        // `graph` is borrowed mutably, so no other attach can register this
        // path between the lookup and the insert.
        let params = make_params(graph.node(parent)?.parameters())?;
        let node = graph.add_child(parent, arc.clone(), params)?;
        self.nodes_lookup.lock().insert(path, node);
        base.stats().incr(Counter::ConstructedNodes);
        trace!(parent = %parent, node = %node, arc = %arc, "node created");
        let enqueue = !self.tree.can_prune(base, graph, open, node)?;
        Ok(ChildOutcome::Created { node, enqueue })
    }

    fn reset(&self) {
        self.tree.reset();
        self.nodes_lookup.lock().clear();
    }
}
