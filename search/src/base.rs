//! State shared by both construction drivers.
//!
//! Holds the two label registries, the policy thresholds and the counters.
//! Which registry holds conflicts is decided by the labeler kind; callers
//! only ever see [`conflicts`](HsBase::conflicts) and
//! [`diagnoses`](HsBase::diagnoses).

use tracing::{debug, trace};

use hsdiag_kernel::constraint::{ConstraintSet, SetDisplay};

use crate::contract::LabelerKind;
use crate::policy::ConstructorPolicy;
use crate::registry::LabelRegistry;
use crate::stats::ConstructionStats;

#[derive(Debug)]
pub struct HsBase {
    kind: LabelerKind,
    policy: ConstructorPolicy,
    node_labels: LabelRegistry,
    path_labels: LabelRegistry,
    stats: ConstructionStats,
}

impl HsBase {
    /// Fresh state. Seed labels from the policy are loaded into the node-label registry.
    #[must_use]
    pub fn new(kind: LabelerKind, policy: ConstructorPolicy) -> Self {
        let base = Self {
            kind,
            policy,
            node_labels: LabelRegistry::new(),
            path_labels: LabelRegistry::new(),
            stats: ConstructionStats::new(),
        };
        base.seed();
        base
    }

    fn seed(&self) {
        self.node_labels
            .extend(self.policy.initial_labels.iter().cloned());
    }

    #[must_use]
    pub fn kind(&self) -> LabelerKind {
        self.kind
    }

    #[must_use]
    pub fn policy(&self) -> &ConstructorPolicy {
        &self.policy
    }

    /// Labels assigned to nodes: conflicts for a conflict labeler.
    #[must_use]
    pub fn node_labels(&self) -> &LabelRegistry {
        &self.node_labels
    }

    /// Path labels of terminal nodes: diagnoses for a conflict labeler.
    #[must_use]
    pub fn path_labels(&self) -> &LabelRegistry {
        &self.path_labels
    }

    #[must_use]
    pub fn stats(&self) -> &ConstructionStats {
        &self.stats
    }

    fn conflict_registry(&self) -> &LabelRegistry {
        match self.kind {
            LabelerKind::Conflict => &self.node_labels,
            LabelerKind::Diagnosis => &self.path_labels,
        }
    }

    fn diagnosis_registry(&self) -> &LabelRegistry {
        match self.kind {
            LabelerKind::Conflict => &self.path_labels,
            LabelerKind::Diagnosis => &self.node_labels,
        }
    }

    /// Known minimal conflicts in discovery order.
    #[must_use]
    pub fn conflicts(&self) -> Vec<ConstraintSet> {
        self.conflict_registry().snapshot()
    }

    /// Known minimal diagnoses in discovery order.
    #[must_use]
    pub fn diagnoses(&self) -> Vec<ConstraintSet> {
        self.diagnosis_registry().snapshot()
    }

    /// `true` once either configured result-count threshold is reached.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        reached(self.policy.max_diagnoses, self.diagnosis_registry().len())
            || reached(self.policy.max_conflicts, self.conflict_registry().len())
    }

    /// How many more node labels fit under the threshold that counts them,
    /// `None` when that threshold is unbounded.
    #[must_use]
    pub fn node_label_budget(&self) -> Option<usize> {
        let max = match self.kind {
            LabelerKind::Conflict => self.policy.max_conflicts,
            LabelerKind::Diagnosis => self.policy.max_diagnoses,
        };
        usize::try_from(max)
            .ok()
            .map(|max| max.saturating_sub(self.node_labels.len()))
    }

    /// Drop the labels that would overshoot the node-label threshold.
    pub(crate) fn cap_to_budget(&self, mut labels: Vec<ConstraintSet>) -> Vec<ConstraintSet> {
        if let Some(budget) = self.node_label_budget() {
            if labels.len() > budget {
                trace!(budget, dropped = labels.len() - budget, "labels beyond threshold");
                labels.truncate(budget);
            }
        }
        labels
    }

    pub(crate) fn add_node_labels(&self, labels: &[ConstraintSet]) {
        for label in labels {
            self.node_labels.push(label.clone());
            debug!(
                kind = self.kind.node_label_noun(),
                n = self.node_labels.len(),
                label = %SetDisplay(label),
                "{} #{} found",
                self.kind.node_label_noun(),
                self.node_labels.len()
            );
        }
    }

    pub(crate) fn add_path_label(&self, path: ConstraintSet) {
        let rendered = SetDisplay(&path).to_string();
        self.path_labels.push(path);
        self.stats.lap_path_label();
        debug!(
            kind = self.kind.path_label_noun(),
            n = self.path_labels.len(),
            label = %rendered,
            "{} #{} found",
            self.kind.path_label_noun(),
            self.path_labels.len()
        );
    }

    /// Clear both registries and counters, then reload the seed labels.
    pub fn reset(&self) {
        self.node_labels.clear();
        self.path_labels.clear();
        self.stats.reset();
        self.seed();
    }
}

fn reached(max: i32, found: usize) -> bool {
    usize::try_from(max).is_ok_and(|max| found >= max)
}
