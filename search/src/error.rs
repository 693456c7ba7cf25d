//! Typed construction errors.
//!
//! `HsError` covers configuration rejected up front, labeler failures
//! propagated out of a run, and graph contract violations. None of them are
//! retried; a failed run leaves the registries in whatever partial state they
//! had reached.

use thiserror::Error;

use crate::node::NodeId;

/// Boxed labeler error, erased so drivers stay generic over the labeler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure of an HS construction or of its configuration.
#[derive(Debug, Error)]
pub enum HsError {
    /// The constructor policy was rejected before any search step.
    #[error("invalid constructor policy: {detail}")]
    InvalidPolicy { detail: String },
    /// The labeler (or the checker behind it) failed. Fatal to the run.
    #[error("labeler failed: {source}")]
    Labeler {
        #[source]
        source: BoxError,
    },
    /// A precondition on the search graph was violated.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl HsError {
    /// Wrap a labeler error.
    pub fn labeler<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Labeler {
            source: Box::new(err),
        }
    }
}

/// Programming-contract violations on the search graph.
///
/// These indicate a bug in a driver or a misused labeler, never a data
/// condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A parent was attached to the root.
    #[error("node {node} is the root and cannot take parents")]
    RootParent { node: NodeId },
    /// A handle did not name a node of this graph.
    #[error("unknown node {node}")]
    UnknownNode { node: NodeId },
    /// Expansion was requested for a node without a label.
    #[error("node {node} has no label to expand")]
    UnlabeledExpansion { node: NodeId },
    /// A second root was requested.
    #[error("graph already has a root")]
    RootExists,
    /// A parent/child edge would break `path(child) = path(parent) ∪ {arc(child)}`.
    #[error("attaching node {child} under node {parent} breaks the path-label invariant")]
    PathMismatch { parent: NodeId, child: NodeId },
}
