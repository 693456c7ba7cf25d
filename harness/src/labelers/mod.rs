//! Concrete labelers driving the HS engines through a consistency checker.
//!
//! - [`QuickXPlainLabeler`](quickxplain::QuickXPlainLabeler): one minimal conflict per call
//! - [`FastDiagLabeler`](fastdiag::FastDiagLabeler): one minimal diagnosis per call
//!
//! Both split the working set in halves and recurse; neither caches checks.

pub mod fastdiag;
pub mod quickxplain;

use thiserror::Error;

use hsdiag_kernel::constraint::{Constraint, ConstraintSet};

use crate::checker::CheckerError;

/// Failure of a harness labeler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelerError {
    #[error("consistency check failed: {0}")]
    Checker(#[from] CheckerError),
}

/// Node state shared by both labelers.
///
/// `c` holds the constraints still under suspicion, `b` the background that
/// is taken as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelParams {
    pub c: ConstraintSet,
    pub b: ConstraintSet,
}

impl LabelParams {
    #[must_use]
    pub fn new(c: ConstraintSet, b: ConstraintSet) -> Self {
        Self { c, b }
    }

    /// `c ∪ b`.
    #[must_use]
    pub fn all(&self) -> ConstraintSet {
        self.c.union(&self.b).cloned().collect()
    }
}

/// Split `set` into its first `len / 2` elements and the rest.
pub(crate) fn split(set: &ConstraintSet) -> (ConstraintSet, ConstraintSet) {
    let k = set.len() / 2;
    let first: ConstraintSet = set.iter().take(k).cloned().collect();
    let second: ConstraintSet = set.iter().skip(k).cloned().collect();
    (first, second)
}

pub(crate) fn union(a: &ConstraintSet, b: &ConstraintSet) -> ConstraintSet {
    a.union(b).cloned().collect()
}

pub(crate) fn without(set: &ConstraintSet, c: &Constraint) -> ConstraintSet {
    let mut out = set.clone();
    out.remove(c);
    out
}
