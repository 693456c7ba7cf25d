//! Consistency-checker contract and a conflict-oracle implementation.
//!
//! Checkers answer one question: is this set of constraints consistent?
//! Labelers call them; the search engine never does.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use hsdiag_kernel::constraint::{sorted_family, ConstraintSet};

/// Typed failure of a consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckerError {
    /// The checker was configured with a finite number of checks and ran out.
    #[error("check budget of {budget} exhausted")]
    BudgetExhausted { budget: u64 },
    /// The underlying solver reported a failure.
    #[error("checker backend failed: {detail}")]
    Backend { detail: String },
}

/// Black-box consistency test over constraint sets.
pub trait ConsistencyChecker: Send + Sync {
    /// `Ok(true)` if `constraints` are jointly satisfiable.
    ///
    /// # Errors
    ///
    /// Returns [`CheckerError`] if the check could not be performed.
    fn is_consistent(&self, constraints: &ConstraintSet) -> Result<bool, CheckerError>;
}

impl<T: ConsistencyChecker + ?Sized> ConsistencyChecker for &T {
    fn is_consistent(&self, constraints: &ConstraintSet) -> Result<bool, CheckerError> {
        (**self).is_consistent(constraints)
    }
}

impl<T: ConsistencyChecker + ?Sized> ConsistencyChecker for std::sync::Arc<T> {
    fn is_consistent(&self, constraints: &ConstraintSet) -> Result<bool, CheckerError> {
        (**self).is_consistent(constraints)
    }
}

/// Checker defined by a family of hidden conflicts.
///
/// A set is inconsistent iff it contains at least one of them. The hidden
/// family need not be minimal.
#[derive(Debug)]
pub struct ConflictOracle {
    conflicts: Vec<ConstraintSet>,
    checks: AtomicU64,
    budget: Option<u64>,
}

impl ConflictOracle {
    #[must_use]
    pub fn new(conflicts: Vec<ConstraintSet>) -> Self {
        Self {
            conflicts,
            checks: AtomicU64::new(0),
            budget: None,
        }
    }

    /// Fail every check after the first `budget`.
    #[must_use]
    pub fn with_check_budget(mut self, budget: u64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Number of checks answered or refused so far.
    #[must_use]
    pub fn checks(&self) -> u64 {
        self.checks.load(Ordering::Relaxed)
    }

    /// Union of all hidden conflicts.
    #[must_use]
    pub fn constraints(&self) -> ConstraintSet {
        self.conflicts.iter().flatten().cloned().collect()
    }

    /// The inclusion-minimal members of the hidden family, sorted.
    #[must_use]
    pub fn minimal_conflicts(&self) -> Vec<ConstraintSet> {
        let unique = sorted_family(&self.conflicts);
        unique
            .iter()
            .filter(|a| {
                !unique
                    .iter()
                    .any(|b| b.len() < a.len() && b.is_subset(a))
            })
            .cloned()
            .collect()
    }
}

impl ConsistencyChecker for ConflictOracle {
    fn is_consistent(&self, constraints: &ConstraintSet) -> Result<bool, CheckerError> {
        let n = self.checks.fetch_add(1, Ordering::Relaxed);
        if let Some(budget) = self.budget {
            if n >= budget {
                return Err(CheckerError::BudgetExhausted { budget });
            }
        }
        Ok(!self.conflicts.iter().any(|c| c.is_subset(constraints)))
    }
}
