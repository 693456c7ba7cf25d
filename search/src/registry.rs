//! Append-mostly registries of discovered labels.
//!
//! Two instances per constructor: one for node labels, one for path labels.
//! Which of them holds conflicts depends on the labeler kind.

use parking_lot::RwLock;

use hsdiag_kernel::constraint::ConstraintSet;

/// Thread-safe ordered collection of constraint sets.
///
/// Insertion order is discovery order. Readers take snapshots so iteration
/// never observes a concurrent append half-way.
#[derive(Debug, Default)]
pub struct LabelRegistry {
    sets: RwLock<Vec<ConstraintSet>>,
}

impl LabelRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, set: ConstraintSet) {
        self.sets.write().push(set);
    }

    pub fn extend<I: IntoIterator<Item = ConstraintSet>>(&self, sets: I) {
        self.sets.write().extend(sets);
    }

    /// Copy of the current contents in discovery order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ConstraintSet> {
        self.sets.read().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.read().is_empty()
    }

    #[must_use]
    pub fn contains(&self, set: &ConstraintSet) -> bool {
        self.sets.read().contains(set)
    }

    /// `true` if some recorded set is a subset of `path`.
    #[must_use]
    pub fn any_subset_of(&self, path: &ConstraintSet) -> bool {
        self.sets.read().iter().any(|s| s.is_subset(path))
    }

    /// Keep only entries for which `keep` returns `true`. Returns how many were dropped.
    pub fn retain<F: FnMut(&ConstraintSet) -> bool>(&self, keep: F) -> usize {
        let mut sets = self.sets.write();
        let before = sets.len();
        sets.retain(keep);
        before - sets.len()
    }

    pub fn clear(&self) {
        self.sets.write().clear();
    }
}
