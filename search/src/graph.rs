//! Arena-backed HS-tree / HS-DAG.
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`]. A node may
//! have several parents (DAG reuse); parent/child links are always updated
//! in pairs so both directions agree.

use std::collections::BTreeMap;

use hsdiag_kernel::constraint::{set_to_json, with_element, Constraint, ConstraintSet};
use hsdiag_kernel::proof::canon::{canonical_json_bytes, CanonError};
use hsdiag_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::error::GraphError;
use crate::node::{NodeId, NodeStatus, SearchNode};

/// The search structure of a single construction run.
#[derive(Debug)]
pub struct SearchGraph<P> {
    nodes: Vec<SearchNode<P>>,
}

impl<P> Default for SearchGraph<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> SearchGraph<P> {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes ever created since the last [`clear`](Self::clear).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root, if one was created.
    #[must_use]
    pub fn root(&self) -> Option<&SearchNode<P>> {
        self.nodes.first()
    }

    /// Nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &SearchNode<P>> {
        self.nodes.iter()
    }

    /// Look up a node.
    ///
    /// # Errors
    ///
    /// [`GraphError::UnknownNode`] if `id` was not issued by this graph.
    pub fn node(&self, id: NodeId) -> Result<&SearchNode<P>, GraphError> {
        self.nodes
            .get(id.index())
            .ok_or(GraphError::UnknownNode { node: id })
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut SearchNode<P>, GraphError> {
        self.nodes
            .get_mut(id.index())
            .ok_or(GraphError::UnknownNode { node: id })
    }

    /// Drop every node. Handles restart at 0.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len() as u64)
    }

    /// Create the root: level 0, empty path label, no parent list.
    pub(crate) fn create_root(
        &mut self,
        label: Option<ConstraintSet>,
        parameters: P,
    ) -> Result<NodeId, GraphError> {
        if !self.nodes.is_empty() {
            return Err(GraphError::RootExists);
        }
        let id = self.next_id();
        self.nodes.push(SearchNode {
            id,
            level: 0,
            status: NodeStatus::Open,
            label,
            arc_label: None,
            path_label: ConstraintSet::new(),
            children: BTreeMap::new(),
            parents: None,
            parameters,
        });
        Ok(id)
    }

    /// Create a fresh child of `parent` reached over `arc`.
    pub(crate) fn add_child(
        &mut self,
        parent: NodeId,
        arc: Constraint,
        parameters: P,
    ) -> Result<NodeId, GraphError> {
        let id = self.next_id();
        let parent_node = self.node_mut(parent)?;
        let level = parent_node.level + 1;
        let path_label = with_element(&parent_node.path_label, &arc);
        parent_node.children.insert(arc.clone(), id);
        self.nodes.push(SearchNode {
            id,
            level,
            status: NodeStatus::Open,
            label: None,
            arc_label: Some(arc),
            path_label,
            children: BTreeMap::new(),
            parents: Some(vec![parent]),
            parameters,
        });
        Ok(id)
    }

    /// Link an existing node under an additional parent over `arc`.
    ///
    /// The node keeps its first arc label; only the new edge uses `arc`.
    ///
    /// # Errors
    ///
    /// [`GraphError::RootParent`] if `child` is the root,
    /// [`GraphError::PathMismatch`] if `path(parent) ∪ {arc} ≠ path(child)`.
    pub(crate) fn add_parent(
        &mut self,
        child: NodeId,
        parent: NodeId,
        arc: Constraint,
    ) -> Result<(), GraphError> {
        let expected = with_element(&self.node(parent)?.path_label, &arc);
        let child_node = self.node_mut(child)?;
        if child_node.is_root() {
            return Err(GraphError::RootParent { node: child });
        }
        if child_node.path_label != expected {
            return Err(GraphError::PathMismatch { parent, child });
        }
        if let Some(parents) = child_node.parents.as_mut() {
            if !parents.contains(&parent) {
                parents.push(parent);
            }
        }
        self.node_mut(parent)?.children.insert(arc, child);
        Ok(())
    }

    /// Remove the edge `parent --arc--> child`, returning the former child.
    pub(crate) fn detach_child(
        &mut self,
        parent: NodeId,
        arc: &Constraint,
    ) -> Result<Option<NodeId>, GraphError> {
        let Some(child) = self.node_mut(parent)?.children.remove(arc) else {
            return Ok(None);
        };
        if let Some(parents) = self.node_mut(child)?.parents.as_mut() {
            parents.retain(|p| *p != parent);
        }
        Ok(Some(child))
    }

    pub(crate) fn set_label(
        &mut self,
        id: NodeId,
        label: ConstraintSet,
    ) -> Result<(), GraphError> {
        self.node_mut(id)?.label = Some(label);
        Ok(())
    }

    pub(crate) fn set_status(&mut self, id: NodeId, status: NodeStatus) -> Result<(), GraphError> {
        self.node_mut(id)?.status = status;
        Ok(())
    }

    /// Count of nodes per status, in `open, closed, pruned, checked` order.
    #[must_use]
    pub fn status_counts(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for node in &self.nodes {
            let slot = match node.status {
                NodeStatus::Open => 0,
                NodeStatus::Closed => 1,
                NodeStatus::Pruned => 2,
                NodeStatus::Checked => 3,
            };
            counts[slot] += 1;
        }
        counts
    }

    /// Structural snapshot: one summary per node in handle order.
    ///
    /// Parameters are labeler-private and not included.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "node_count": self.nodes.len(),
            "nodes": self.nodes.iter().map(node_summary_to_json).collect::<Vec<_>>(),
        })
    }

    /// Canonical JSON bytes of [`to_json_value`](Self::to_json_value).
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content hash of the graph structure.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(HashDomain::SearchGraph, &bytes))
    }
}

fn node_summary_to_json<P>(n: &SearchNode<P>) -> serde_json::Value {
    let children: serde_json::Map<String, serde_json::Value> = n
        .children
        .iter()
        .map(|(arc, child)| (arc.name().to_string(), serde_json::json!(child.get())))
        .collect();
    serde_json::json!({
        "arc_label": n.arc_label.as_ref().map(|c| c.name().to_string()),
        "children": children,
        "label": n.label.as_ref().map(set_to_json),
        "level": n.level,
        "node_id": n.id.get(),
        "parents": n.parents.as_ref().map(|ps| ps.iter().map(|p| p.get()).collect::<Vec<_>>()),
        "path_label": set_to_json(&n.path_label),
        "status": n.status.as_str(),
    })
}
