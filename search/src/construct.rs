//! HS-Tree and HS-DAG construction drivers.
//!
//! One breadth-first loop serves both; the pruning engine type parameter
//! selects tree or DAG behavior.
//!
//! ```text
//! root label ──► create root ──► queue
//!                                  │
//!   ┌──────────────────────────────┘
//!   ▼
//! pop ─► skip? (status, depth, 3.i, 3.ii) ─► label (reuse | labeler) ─► expand
//!                                              │
//!                                              └─► no label: Checked, record path
//! ```

use std::time::Instant;

use tracing::{debug, debug_span, enabled, trace, Level};

use hsdiag_kernel::constraint::{ConstraintSet, FamilyDisplay, SetDisplay};

use crate::base::HsBase;
use crate::contract::Labeler;
use crate::error::{GraphError, HsError};
use crate::frontier::OpenQueue;
use crate::graph::SearchGraph;
use crate::node::{NodeId, NodeStatus};
use crate::policy::ConstructorPolicy;
use crate::pruning::dag::DagPruningEngine;
use crate::pruning::tree::TreePruningEngine;
use crate::pruning::{ChildOutcome, EngineKind, PruningEngine};
use crate::report::ConstructionReport;
use crate::stats::{ConstructionStats, Counter};

/// Reiter's HS-tree with Greiner's correction. Requires minimal labels.
pub type HsTree<L> = HsConstructor<L, TreePruningEngine>;

/// HS-DAG: node reuse and minimality maintenance. Tolerates non-minimal labels.
pub type HsDag<L> = HsConstructor<L, DagPruningEngine>;

/// A construction driver over labeler `L` and pruning engine `E`.
///
/// The control loop is single-threaded. The registries and engine indexes
/// are individually locked and may be read while a run is in progress.
pub struct HsConstructor<L: Labeler, E: PruningEngine> {
    labeler: L,
    base: HsBase,
    graph: SearchGraph<L::Params>,
    open: OpenQueue,
    engine: E,
}

impl<L: Labeler, E: PruningEngine> HsConstructor<L, E> {
    /// Build a driver.
    ///
    /// # Errors
    ///
    /// [`HsError::InvalidPolicy`] if `policy` fails validation.
    pub fn new(labeler: L, policy: ConstructorPolicy) -> Result<Self, HsError> {
        policy.validate()?;
        let base = HsBase::new(labeler.kind(), policy);
        Ok(Self {
            labeler,
            base,
            graph: SearchGraph::new(),
            open: OpenQueue::new(),
            engine: E::default(),
        })
    }

    #[must_use]
    pub fn engine_kind(&self) -> EngineKind {
        self.engine.engine_kind()
    }

    #[must_use]
    pub fn labeler(&self) -> &L {
        &self.labeler
    }

    #[must_use]
    pub fn base(&self) -> &HsBase {
        &self.base
    }

    #[must_use]
    pub fn graph(&self) -> &SearchGraph<L::Params> {
        &self.graph
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[must_use]
    pub fn stats(&self) -> &ConstructionStats {
        self.base.stats()
    }

    /// Minimal conflicts found so far, in discovery order.
    #[must_use]
    pub fn conflicts(&self) -> Vec<ConstraintSet> {
        self.base.conflicts()
    }

    /// Minimal diagnoses found so far, in discovery order.
    #[must_use]
    pub fn diagnoses(&self) -> Vec<ConstraintSet> {
        self.base.diagnoses()
    }

    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.base.should_stop()
    }

    /// Number of nodes still waiting in the open queue.
    #[must_use]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Report of the current results.
    #[must_use]
    pub fn report(&self) -> ConstructionReport {
        ConstructionReport::new(
            self.engine_kind(),
            self.base.kind(),
            self.base.policy(),
            &self.conflicts(),
            &self.diagnoses(),
            self.stats().snapshot(),
        )
    }

    /// Run the construction until the queue drains or a threshold fires.
    ///
    /// Calling again without [`reset_engine`](Self::reset_engine) continues
    /// with whatever nodes are still queued.
    ///
    /// # Errors
    ///
    /// [`HsError::Labeler`] if the labeler fails; the registries keep what
    /// was found up to that point. [`HsError::Graph`] on contract violations.
    pub fn construct(&mut self) -> Result<(), HsError> {
        let span = debug_span!(
            "hs_construct",
            engine = self.engine_kind().as_str(),
            labeler = self.base.kind().as_str()
        );
        let _entered = span.enter();
        let started = Instant::now();
        self.base.stats().start_path_label_timer();
        debug!("construction started");

        let outcome = self.run();
        self.base.stats().record_session(started);
        self.end_construction();
        outcome
    }

    fn run(&mut self) -> Result<(), HsError> {
        if self.graph.is_empty() && !self.create_root()? {
            return Ok(());
        }

        while !self.base.should_stop() {
            let Some(id) = self.open.pop(&self.graph) else {
                break;
            };
            if !self.graph.node(id)?.is_root()
                && self
                    .engine
                    .skip_node(&self.base, &mut self.graph, &self.open, id)?
            {
                continue;
            }
            trace!(node = %id, "processing");

            self.label(id)?;
            if self.base.should_stop() {
                break;
            }
            if self.graph.node(id)?.is_open() {
                self.expand(id)?;
            }
        }
        Ok(())
    }

    /// Label and queue the root. Returns `false` if there is nothing to diagnose.
    fn create_root(&mut self) -> Result<bool, HsError> {
        let params = self.labeler.initial_parameters();
        let labels = match self.base.node_labels().snapshot().into_iter().next() {
            Some(seed) => {
                self.base.stats().incr(Counter::ReusedLabels);
                vec![seed]
            }
            None => {
                let computed = self.call_labeler(&params)?;
                if computed.is_empty() {
                    computed
                } else {
                    self.engine
                        .process_labels(&self.base, &mut self.graph, computed)?
                }
            }
        };
        let Some(label) = labels.into_iter().next() else {
            debug!("root has no label; nothing to diagnose");
            return Ok(false);
        };

        let root = self.graph.create_root(Some(label.clone()), params)?;
        self.base.stats().incr(Counter::ConstructedNodes);
        self.engine.add_item_to_label_nodes(&label, root);
        trace!(node = %root, label = %SetDisplay(&label), "root created");
        self.open.push(root, &ConstraintSet::new());
        Ok(true)
    }

    fn call_labeler(&self, params: &L::Params) -> Result<Vec<ConstraintSet>, HsError> {
        self.base.stats().incr(Counter::LabelerCalls);
        self.base
            .stats()
            .time_label(|| self.labeler.label(params))
            .map_err(HsError::labeler)
    }

    fn label(&mut self, id: NodeId) -> Result<(), HsError> {
        if self.graph.node(id)?.label().is_some() {
            return Ok(());
        }

        let mut labels = self.engine.reusable_labels(&self.base, &self.graph, id)?;
        if labels.is_empty() {
            let computed = self.call_labeler(self.graph.node(id)?.parameters())?;
            if !computed.is_empty() {
                labels = self
                    .engine
                    .process_labels(&self.base, &mut self.graph, computed)?;
            }
        }

        let node = self.graph.node(id)?;
        if !node.is_open() {
            // Pruned by the maintenance pass this label triggered.
            return Ok(());
        }
        match labels.into_iter().next() {
            Some(label) => {
                self.graph.set_label(id, label.clone())?;
                self.engine.add_item_to_label_nodes(&label, id);
            }
            None => {
                let path = node.path_label().clone();
                self.graph.set_status(id, NodeStatus::Checked)?;
                self.base.add_path_label(path);
            }
        }
        Ok(())
    }

    fn expand(&mut self, id: NodeId) -> Result<(), HsError> {
        let label = self
            .graph
            .node(id)?
            .label()
            .cloned()
            .ok_or(GraphError::UnlabeledExpansion { node: id })?;
        trace!(node = %id, label = %SetDisplay(&label), "expanding");

        let labeler = &self.labeler;
        for arc in &label {
            let outcome = self.engine.attach_child(
                &self.base,
                &mut self.graph,
                &self.open,
                id,
                arc,
                |params| labeler.create_parameter(params, arc).map_err(HsError::labeler),
            )?;
            if let ChildOutcome::Created {
                node,
                enqueue: true,
            } = outcome
            {
                let path = self.graph.node(node)?.path_label().clone();
                self.open.push(node, &path);
            }
        }
        Ok(())
    }

    fn end_construction(&self) {
        let conflicts = self.conflicts();
        let diagnoses = self.diagnoses();
        debug!(
            conflicts = %FamilyDisplay(&conflicts),
            diagnoses = %FamilyDisplay(&diagnoses),
            nodes = self.graph.len(),
            "construction finished"
        );
        if enabled!(Level::TRACE) {
            for node in self.graph.iter() {
                trace!(%node, "graph");
            }
        }
    }

    /// Forget every result, node and index. Seed labels are restored.
    pub fn reset_engine(&mut self) {
        self.base.reset();
        self.graph.clear();
        self.open.clear();
        self.engine.reset();
    }

    /// Tear the driver down, handing the labeler back.
    #[must_use]
    pub fn dispose(self) -> L {
        self.labeler
    }
}
