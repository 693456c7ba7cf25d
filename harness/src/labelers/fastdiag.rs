//! FastDiag: divide-and-conquer search for one minimal diagnosis.

use tracing::trace;

use hsdiag_kernel::constraint::{difference, Constraint, ConstraintSet, SetDisplay};
use hsdiag_search::contract::{Labeler, LabelerKind};

use super::{split, union, without, LabelParams, LabelerError};
use crate::checker::ConsistencyChecker;

/// Diagnosis labeler. A child moves its arc constraint from `c` into `b`,
/// so the constraint is kept and no longer eligible for removal.
#[derive(Debug)]
pub struct FastDiagLabeler<C> {
    checker: C,
    initial: LabelParams,
}

impl<C: ConsistencyChecker> FastDiagLabeler<C> {
    /// Diagnose `c` while keeping `b`.
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

    /// One minimal diagnosis of `c`, or `None` if `b` alone is inconsistent
    /// or `c ∪ b` needs no repair.
    ///
    /// # Errors
    ///
    /// Propagates checker failures.
    pub fn find_diagnosis(
        &self,
        params: &LabelParams,
    ) -> Result<Option<ConstraintSet>, LabelerError> {
        if params.c.is_empty() || !self.checker.is_consistent(&params.b)? {
            return Ok(None);
        }
        let all = params.all();
        if self.checker.is_consistent(&all)? {
            return Ok(None);
        }
        let diag = self.fd(&ConstraintSet::new(), &params.c, &all)?;
        trace!(diagnosis = %SetDisplay(&diag), "fastdiag");
        Ok(Some(diag))
    }

    fn fd(
        &self,
        d: &ConstraintSet,
        c: &ConstraintSet,
        ac: &ConstraintSet,
    ) -> Result<ConstraintSet, LabelerError> {
        if !d.is_empty() && self.checker.is_consistent(ac)? {
            return Ok(ConstraintSet::new());
        }
        if c.len() == 1 {
            return Ok(c.clone());
        }
        let (c1, c2) = split(c);
        let d1 = self.fd(&c1, &c2, &difference(ac, &c1))?;
        let d2 = self.fd(&d1, &c1, &difference(ac, &d1))?;
        Ok(union(&d1, &d2))
    }
}

impl<C: ConsistencyChecker> Labeler for FastDiagLabeler<C> {
    type Params = LabelParams;
    type Error = LabelerError;

    fn kind(&self) -> LabelerKind {
        LabelerKind::Diagnosis
    }

    fn initial_parameters(&self) -> LabelParams {
        self.initial.clone()
    }

    fn label(&self, params: &LabelParams) -> Result<Vec<ConstraintSet>, LabelerError> {
        Ok(self.find_diagnosis(params)?.into_iter().collect())
    }

    fn create_parameter(
        &self,
        parent: &LabelParams,
        arc: &Constraint,
    ) -> Result<LabelParams, LabelerError> {
        let mut b = parent.b.clone();
        b.insert(arc.clone());
        Ok(LabelParams::new(without(&parent.c, arc), b))
    }
}
