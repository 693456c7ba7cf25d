//! Runner: execute a labeler through the requested driver and package a
//! digest-bound report.
//!
//! # Pipeline
//!
//! ```text
//! policy.validate() → HsTree | HsDag → construct()
//!   → ConstructionReport → canonical JSON bytes → digests
//! ```

use thiserror::Error;
use tracing::{debug, info};

use hsdiag_kernel::proof::canon::CanonError;
use hsdiag_kernel::proof::hash::ContentHash;
use hsdiag_search::construct::HsConstructor;
use hsdiag_search::contract::Labeler;
use hsdiag_search::error::HsError;
use hsdiag_search::policy::ConstructorPolicy;
use hsdiag_search::pruning::dag::DagPruningEngine;
use hsdiag_search::pruning::tree::TreePruningEngine;
use hsdiag_search::pruning::{EngineKind, PruningEngine};
use hsdiag_search::report::ConstructionReport;

/// Failure of a harness run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Construction failed or the policy was rejected.
    #[error(transparent)]
    Construction(#[from] HsError),
    /// The report could not be serialized.
    #[error("report serialization failed: {0}")]
    Canon(#[from] CanonError),
}

/// Result of one run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: ConstructionReport,
    /// Canonical JSON of `report`.
    pub report_bytes: Vec<u8>,
    /// Hash of `report_bytes`.
    pub digest: ContentHash,
    /// Hash of the sorted conflicts and diagnoses only.
    pub result_digest: ContentHash,
    /// Nodes in the graph when construction ended.
    pub node_count: usize,
}

/// Run `labeler` through the driver selected by `engine`.
///
/// # Errors
///
/// [`RunError::Construction`] for policy or labeler failures,
/// [`RunError::Canon`] if the report cannot be serialized.
pub fn run<L: Labeler>(
    engine: EngineKind,
    labeler: L,
    policy: ConstructorPolicy,
) -> Result<RunOutcome, RunError> {
    match engine {
        EngineKind::Tree => run_with::<L, TreePruningEngine>(labeler, policy),
        EngineKind::Dag => run_with::<L, DagPruningEngine>(labeler, policy),
    }
}

fn run_with<L: Labeler, E: PruningEngine>(
    labeler: L,
    policy: ConstructorPolicy,
) -> Result<RunOutcome, RunError> {
    let mut hs = HsConstructor::<L, E>::new(labeler, policy)?;
    hs.construct()?;
    let outcome = package(hs.report(), hs.graph().len())?;
    info!(
        engine = outcome.report.engine.as_str(),
        conflicts = outcome.report.conflicts.len(),
        diagnoses = outcome.report.diagnoses.len(),
        nodes = outcome.node_count,
        digest = %outcome.digest,
        "run complete"
    );
    Ok(outcome)
}

/// Serialize and hash a report.
///
/// # Errors
///
/// Returns [`CanonError`] if serialization fails.
pub fn package(report: ConstructionReport, node_count: usize) -> Result<RunOutcome, CanonError> {
    let report_bytes = report.to_canonical_json_bytes()?;
    let digest = report.digest()?;
    let result_digest = report.result_digest()?;
    debug!(bytes = report_bytes.len(), "report packaged");
    Ok(RunOutcome {
        report,
        report_bytes,
        digest,
        result_digest,
        node_count,
    })
}
