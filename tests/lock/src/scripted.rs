//! Labeler over a hidden family with per-path overrides.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use hsdiag_kernel::constraint::{has_intersection, with_element, Constraint, ConstraintSet};
use hsdiag_search::contract::{Labeler, LabelerKind};

/// Labels a node with every hidden set disjoint from its path label.
///
/// Parameters are the path label itself. [`ScriptedLabeler::with_script`]
/// replaces the answer for one exact path, which is how tests hand the
/// drivers non-minimal labels. [`ScriptedLabeler::failing_after`] turns
/// every call past a threshold into an error.
#[derive(Debug)]
pub struct ScriptedLabeler {
    kind: LabelerKind,
    hidden: Vec<ConstraintSet>,
    script: HashMap<ConstraintSet, Vec<ConstraintSet>>,
    fail_after: Option<usize>,
    calls: AtomicUsize,
}

#[derive(Debug, thiserror::Error)]
#[error("scripted labeler refused call {call}")]
pub struct ScriptError {
    pub call: usize,
}

impl ScriptedLabeler {
    #[must_use]
    pub fn new(kind: LabelerKind, hidden: Vec<ConstraintSet>) -> Self {
        Self {
            kind,
            hidden,
            script: HashMap::new(),
            fail_after: None,
            calls: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_script(mut self, path: ConstraintSet, labels: Vec<ConstraintSet>) -> Self {
        self.script.insert(path, labels);
        self
    }

    #[must_use]
    pub fn failing_after(mut self, ok_calls: usize) -> Self {
        self.fail_after = Some(ok_calls);
        self
    }

    /// Number of `label` calls so far, including refused ones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Labeler for ScriptedLabeler {
    type Params = ConstraintSet;
    type Error = ScriptError;

    fn kind(&self) -> LabelerKind {
        self.kind
    }

    fn initial_parameters(&self) -> ConstraintSet {
        ConstraintSet::new()
    }

    fn label(&self, path: &ConstraintSet) -> Result<Vec<ConstraintSet>, ScriptError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        if self.fail_after.is_some_and(|ok| call > ok) {
            return Err(ScriptError { call });
        }
        if let Some(labels) = self.script.get(path) {
            return Ok(labels.clone());
        }
        Ok(self
            .hidden
            .iter()
            .filter(|set| !has_intersection(set, path))
            .cloned()
            .collect())
    }

    fn create_parameter(
        &self,
        parent: &ConstraintSet,
        arc: &Constraint,
    ) -> Result<ConstraintSet, ScriptError> {
        Ok(with_element(parent, arc))
    }
}
