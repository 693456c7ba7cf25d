//! Labeler contract.

use std::fmt;

use hsdiag_kernel::constraint::{Constraint, ConstraintSet};

/// Which kind of minimal set a labeler natively produces.
///
/// Node labels carry this kind; path labels of terminal nodes carry the dual
/// kind. A conflict labeler's terminal paths are diagnoses and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelerKind {
    Conflict,
    Diagnosis,
}

impl LabelerKind {
    /// Noun for the sets this labeler puts on nodes.
    #[must_use]
    pub fn node_label_noun(self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::Diagnosis => "diagnosis",
        }
    }

    /// Noun for the sets recorded at terminal paths.
    #[must_use]
    pub fn path_label_noun(self) -> &'static str {
        match self {
            Self::Conflict => "diagnosis",
            Self::Diagnosis => "conflict",
        }
    }

    /// Stable identifier used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Conflict => "conflict",
            Self::Diagnosis => "diagnosis",
        }
    }
}

/// A pluggable strategy computing minimal labels for a node's state.
///
/// # Contract
///
/// - `label` returns zero or more labels for the node whose parameters are
///   given. An empty result means the node is terminal: its path label is a
///   complete result of the dual kind.
/// - Labels returned for a node must be disjoint from that node's path label.
/// - HS-Tree requires every returned label to be minimal. HS-DAG tolerates
///   non-minimal labels and repairs the graph when smaller ones appear.
/// - `create_parameter` derives a child's state from its parent's state and
///   the arc constraint leading to the child.
/// - Errors are fatal to the running construction. Drivers never retry.
///
/// Implementations are `Send + Sync` so several label computations can share
/// one labeler.
pub trait Labeler: Send + Sync {
    /// Opaque per-node state threaded through the search.
    type Params: Clone + fmt::Debug + Send + Sync;
    /// Failure raised by the labeler or the checker behind it.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The kind of set this labeler produces.
    fn kind(&self) -> LabelerKind;

    /// State for the root node.
    fn initial_parameters(&self) -> Self::Params;

    /// Compute labels for a node.
    ///
    /// # Errors
    ///
    /// Returns the labeler's error if label computation fails.
    fn label(&self, params: &Self::Params) -> Result<Vec<ConstraintSet>, Self::Error>;

    /// Derive a child's parameters from its parent's and the arc constraint.
    ///
    /// # Errors
    ///
    /// Returns the labeler's error if the parent parameters are unusable.
    fn create_parameter(
        &self,
        parent: &Self::Params,
        arc: &Constraint,
    ) -> Result<Self::Params, Self::Error>;
}

impl<T: Labeler> Labeler for &T {
    type Params = T::Params;
    type Error = T::Error;

    fn kind(&self) -> LabelerKind {
        (**self).kind()
    }

    fn initial_parameters(&self) -> Self::Params {
        (**self).initial_parameters()
    }

    fn label(&self, params: &Self::Params) -> Result<Vec<ConstraintSet>, Self::Error> {
        (**self).label(params)
    }

    fn create_parameter(
        &self,
        parent: &Self::Params,
        arc: &Constraint,
    ) -> Result<Self::Params, Self::Error> {
        (**self).create_parameter(parent, arc)
    }
}
