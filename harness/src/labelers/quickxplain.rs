//! QuickXPlain: divide-and-conquer search for one minimal conflict.

use tracing::trace;

use hsdiag_kernel::constraint::{Constraint, ConstraintSet, SetDisplay};
use hsdiag_search::contract::{Labeler, LabelerKind};

use super::{split, union, without, LabelParams, LabelerError};
use crate::checker::ConsistencyChecker;

/// Conflict labeler. A child drops its arc constraint from `c`.
#[derive(Debug)]
pub struct QuickXPlainLabeler<C> {
    checker: C,
    initial: LabelParams,
}

impl<C: ConsistencyChecker> QuickXPlainLabeler<C> {
    /// Search conflicts within `c`, taking `b` as consistent background.
    pub fn new(checker: C, c: ConstraintSet, b: ConstraintSet) -> Self {
        Self {
            checker,
            initial: LabelParams::new(c, b),
        }
    }

    #[must_use]
    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// One minimal conflict of `c` w.r.t. `b`, or `None` if `c ∪ b` is consistent.
    ///
    /// # Errors
    ///
    /// Propagates checker failures.
    pub fn find_conflict(&self, params: &LabelParams) -> Result<Option<ConstraintSet>, LabelerError> {
        if params.c.is_empty() || self.checker.is_consistent(&params.all())? {
            return Ok(None);
        }
        let cs = self.qx(&ConstraintSet::new(), &params.b, &params.c)?;
        trace!(conflict = %SetDisplay(&cs), "quickxplain");
        Ok(Some(cs))
    }

    fn qx(
        &self,
        d: &ConstraintSet,
        b: &ConstraintSet,
        c: &ConstraintSet,
    ) -> Result<ConstraintSet, LabelerError> {
        if !d.is_empty() && !self.checker.is_consistent(b)? {
            return Ok(ConstraintSet::new());
        }
        if c.len() == 1 {
            return Ok(c.clone());
        }
        let (c1, c2) = split(c);
        let d2 = self.qx(&c1, &union(b, &c1), &c2)?;
        let d1 = self.qx(&d2, &union(b, &d2), &c1)?;
        Ok(union(&d1, &d2))
    }
}

impl<C: ConsistencyChecker> Labeler for QuickXPlainLabeler<C> {
    type Params = LabelParams;
    type Error = LabelerError;

    fn kind(&self) -> LabelerKind {
        LabelerKind::Conflict
    }

    fn initial_parameters(&self) -> LabelParams {
        self.initial.clone()
    }

    fn label(&self, params: &LabelParams) -> Result<Vec<ConstraintSet>, LabelerError> {
        Ok(self.find_conflict(params)?.into_iter().collect())
    }

    fn create_parameter(
        &self,
        parent: &LabelParams,
        arc: &Constraint,
    ) -> Result<LabelParams, LabelerError> {
        Ok(LabelParams::new(without(&parent.c, arc), parent.b.clone()))
    }
}
