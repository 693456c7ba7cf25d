//! Search node and node status types.

use std::collections::BTreeMap;
use std::fmt;

use hsdiag_kernel::constraint::{Constraint, ConstraintSet, SetDisplay};

/// Handle of a node in a [`SearchGraph`](crate::graph::SearchGraph) arena.
///
/// Handles are assigned in creation order starting at 0 for the root and
/// restart when the graph is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// The numeric sequence number.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a search node.
///
/// `Open → {Closed, Pruned, Checked}`; no transitions leave the last three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    /// Eligible for labeling and expansion.
    Open,
    /// Closed by rule 3.i or 3.ii before it was ever labeled.
    Closed,
    /// Invalidated by minimality maintenance after it was generated.
    Pruned,
    /// Terminal: its path label was recorded as a result.
    Checked,
}

impl NodeStatus {
    /// Stable identifier used in graph snapshots.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Pruned => "pruned",
            Self::Checked => "checked",
        }
    }
}

/// A node of an HS-tree or HS-DAG.
///
/// Structural fields are only mutated through the owning graph so the
/// parent/child links stay symmetric.
#[derive(Debug)]
pub struct SearchNode<P> {
    pub(crate) id: NodeId,
    pub(crate) level: u32,
    pub(crate) status: NodeStatus,
    pub(crate) label: Option<ConstraintSet>,
    pub(crate) arc_label: Option<Constraint>,
    pub(crate) path_label: ConstraintSet,
    pub(crate) children: BTreeMap<Constraint, NodeId>,
    /// `None` marks the root. A detached non-root node has `Some(vec![])`.
    pub(crate) parents: Option<Vec<NodeId>>,
    pub(crate) parameters: P,
}

impl<P> SearchNode<P> {
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Distance from the root (root = 0).
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn status(&self) -> NodeStatus {
        self.status
    }

    /// The conflict or diagnosis assigned to this node, if computed.
    #[must_use]
    pub fn label(&self) -> Option<&ConstraintSet> {
        self.label.as_ref()
    }

    /// The constraint on the edge leading here. `None` only for the root.
    #[must_use]
    pub fn arc_label(&self) -> Option<&Constraint> {
        self.arc_label.as_ref()
    }

    /// All arc labels on a root-to-node path.
    #[must_use]
    pub fn path_label(&self) -> &ConstraintSet {
        &self.path_label
    }

    /// Children keyed by arc constraint.
    #[must_use]
    pub fn children(&self) -> &BTreeMap<Constraint, NodeId> {
        &self.children
    }

    /// Parent handles. Empty for the root and for detached nodes.
    #[must_use]
    pub fn parents(&self) -> &[NodeId] {
        self.parents.as_deref().unwrap_or(&[])
    }

    /// `true` for the node created as root; never inferred from an empty parent list.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_none()
    }

    /// Labeler-defined state for this node.
    #[must_use]
    pub fn parameters(&self) -> &P {
        &self.parameters
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == NodeStatus::Open
    }
}

impl<P> fmt::Display for SearchNode<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node{{id={}, level={}, status={}, label=",
            self.id,
            self.level,
            self.status.as_str()
        )?;
        match &self.label {
            Some(label) => write!(f, "{}", SetDisplay(label))?,
            None => f.write_str("none")?,
        }
        match &self.arc_label {
            Some(arc) => write!(f, ", arc={arc}")?,
            None => f.write_str(", arc=none")?,
        }
        write!(f, ", path={}}}", SetDisplay(&self.path_label))
    }
}
