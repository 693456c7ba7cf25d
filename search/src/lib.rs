//! hsdiag search: HS-Tree and HS-DAG construction for minimal conflicts and diagnoses.
//!
//! This crate provides the search layer. It depends only on `hsdiag_kernel`;
//! concrete labelers and consistency checkers live in `hsdiag_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! hsdiag_kernel  ←  hsdiag_search  ←  hsdiag_harness
//! (constraints,     (graph, pruning,    (checkers, labelers,
//!  digests)          drivers)            runner)
//! ```
//!
//! # Key types
//!
//! - [`SearchNode`](node::SearchNode) — arena node with label, path label and status
//! - [`SearchGraph`](graph::SearchGraph) — arena owning every node of one construction
//! - [`HsBase`](base::HsBase) — label registries, thresholds, conflicts/diagnoses view
//! - [`Labeler`](contract::Labeler) — pluggable strategy returning minimal labels
//! - [`ConstructorPolicy`](policy::ConstructorPolicy) — thresholds and seed labels
//! - [`TreePruningEngine`](pruning::tree::TreePruningEngine) — closing rules 3.i/3.ii, label reuse
//! - [`DagPruningEngine`](pruning::dag::DagPruningEngine) — node reuse and minimality maintenance
//! - [`HsTree`](construct::HsTree) / [`HsDag`](construct::HsDag) — the construction drivers

#![forbid(unsafe_code)]

pub mod base;
pub mod construct;
pub mod contract;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod node;
pub mod policy;
pub mod pruning;
pub mod registry;
pub mod report;
pub mod stats;

