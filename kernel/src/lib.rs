//! hsdiag kernel: the constraint model shared by every hsdiag crate.
//!
//! # API Surface
//!
//! - [`constraint`] -- [`Constraint`](constraint::Constraint), the
//!   [`ConstraintSet`](constraint::ConstraintSet) label type and set algebra
//! - [`proof::canon::canonical_json_bytes`] -- the single canonical JSON encoder
//! - [`proof::hash::canonical_hash`] -- domain-separated SHA-256 content hashing
//!
//! # Module Dependency Direction
//!
//! `constraint` ← `proof`
//!
//! The kernel knows nothing about search graphs or labelers. It only defines
//! what a label is and how result families are committed to a digest.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod constraint;
pub mod proof;
