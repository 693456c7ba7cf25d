//! hsdiag harness: concrete collaborators for the HS engines.
//!
//! The harness supplies what the search crate deliberately leaves abstract:
//! a consistency checker, labelers built on it, canned models, and a runner
//! that executes a labeler through either driver and packages the report.
//!
//! The harness does NOT implement search logic; it delegates to
//! `hsdiag_search`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod checker;
pub mod labelers;
pub mod models;
pub mod report_dir;
pub mod runner;
