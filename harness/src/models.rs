//! Canned conflict families used by tests and benchmarks.
//!
//! Each model is a hidden-conflict family for a [`ConflictOracle`] plus the
//! constraint universe it is diagnosed over.

use hsdiag_kernel::constraint::{constraint_set, ConstraintSet};

use crate::checker::ConflictOracle;

/// A named diagnosis problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictModel {
    pub name: String,
    pub conflicts: Vec<ConstraintSet>,
}

impl ConflictModel {
    #[must_use]
    pub fn oracle(&self) -> ConflictOracle {
        ConflictOracle::new(self.conflicts.clone())
    }

    /// Every constraint mentioned by some conflict.
    #[must_use]
    pub fn universe(&self) -> ConstraintSet {
        self.conflicts.iter().flatten().cloned().collect()
    }
}

/// `{A,C}` and `{B,D}`: four diagnoses of size two.
#[must_use]
pub fn abcd() -> ConflictModel {
    ConflictModel {
        name: "abcd".into(),
        conflicts: vec![constraint_set(["A", "C"]), constraint_set(["B", "D"])],
    }
}

/// Every pair of three constraints conflicts.
#[must_use]
pub fn triangle() -> ConflictModel {
    ConflictModel {
        name: "triangle".into(),
        conflicts: vec![
            constraint_set(["A", "B"]),
            constraint_set(["A", "C"]),
            constraint_set(["B", "C"]),
        ],
    }
}

/// `k` disjoint pairs `{a_i, b_i}`: `2^k` diagnoses.
#[must_use]
pub fn disjoint_pairs(k: usize) -> ConflictModel {
    ConflictModel {
        name: format!("disjoint_pairs_{k}"),
        conflicts: (0..k)
            .map(|i| constraint_set([format!("a{i}"), format!("b{i}")]))
            .collect(),
    }
}

/// Sliding windows of width `w` over `n` constraints `c0..c{n-1}`.
///
/// Neighbouring windows overlap, so many paths reach the same node.
#[must_use]
pub fn sliding_windows(n: usize, w: usize) -> ConflictModel {
    let w = w.clamp(1, n.max(1));
    ConflictModel {
        name: format!("sliding_windows_{n}_{w}"),
        conflicts: (0..=n.saturating_sub(w))
            .map(|start| constraint_set((start..start + w).map(|i| format!("c{i}"))))
            .collect(),
    }
}

/// A small camera configuration knowledge base with conflicting requirements.
#[must_use]
pub fn camera() -> ConflictModel {
    ConflictModel {
        name: "camera".into(),
        conflicts: vec![
            constraint_set(["price<=500", "resolution=30MP"]),
            constraint_set(["price<=500", "lens=zoom"]),
            constraint_set(["weight<=300", "lens=zoom"]),
            constraint_set(["waterproof", "resolution=30MP", "weight<=300"]),
        ],
    }
}

/// Every model with a fixed size.
#[must_use]
pub fn catalog() -> Vec<ConflictModel> {
    vec![
        abcd(),
        triangle(),
        camera(),
        disjoint_pairs(3),
        sliding_windows(6, 3),
    ]
}
