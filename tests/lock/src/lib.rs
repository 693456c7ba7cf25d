//! Shared helpers for the lock tests.
//!
//! - [`reference`]: brute-force minimal conflicts and minimal hitting sets,
//!   the ground truth the drivers are compared against.
//! - [`scripted`]: a labeler over a hidden family with per-path overrides,
//!   used to feed the drivers non-minimal labels.

pub mod scripted;
