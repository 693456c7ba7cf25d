//! Shared helpers for hsdiag benchmark suites.

use hsdiag_harness::labelers::fastdiag::FastDiagLabeler;
use hsdiag_harness::labelers::quickxplain::QuickXPlainLabeler;
use hsdiag_harness::models::{self, ConflictModel};
use hsdiag_harness::runner::{run, RunOutcome};
use hsdiag_kernel::constraint::ConstraintSet;
use hsdiag_kernel::proof::canon::canonical_json_bytes;
use hsdiag_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use hsdiag_search::policy::ConstructorPolicy;
use hsdiag_search::pruning::EngineKind;

/// Which labeler a benchmark case drives the engines with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelerChoice {
    QuickXPlain,
    FastDiag,
}

impl LabelerChoice {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QuickXPlain => "quickxplain",
            Self::FastDiag => "fastdiag",
        }
    }
}

/// Models sized so a single run takes milliseconds, not microseconds.
///
/// Disjoint pairs stress breadth (2^k diagnoses); sliding windows stress
/// node reuse.
#[must_use]
pub fn bench_models() -> Vec<ConflictModel> {
    vec![
        models::camera(),
        models::disjoint_pairs(5),
        models::disjoint_pairs(7),
        models::sliding_windows(10, 3),
        models::sliding_windows(12, 4),
    ]
}

/// Run one model end to end.
///
/// # Panics
///
/// Panics if the run fails. Benchmark runs are expected to succeed.
#[must_use]
pub fn run_model(
    engine: EngineKind,
    labeler: LabelerChoice,
    model: &ConflictModel,
    policy: &ConstructorPolicy,
) -> RunOutcome {
    let universe = model.universe();
    match labeler {
        LabelerChoice::QuickXPlain => run(
            engine,
            QuickXPlainLabeler::new(model.oracle(), universe, ConstraintSet::new()),
            policy.clone(),
        ),
        LabelerChoice::FastDiag => run(
            engine,
            FastDiagLabeler::new(model.oracle(), universe, ConstraintSet::new()),
            policy.clone(),
        ),
    }
    .expect("benchmark run should succeed")
}

/// Determinism guard over a set of runs.
///
/// Binds model names and result digests, so two benchmark sessions that
/// produce the same guard measured the same work.
///
/// # Panics
///
/// Panics if canonical serialization fails.
#[must_use]
pub fn guard_digest(runs: &[(String, RunOutcome)]) -> ContentHash {
    let entries: Vec<serde_json::Value> = runs
        .iter()
        .map(|(name, out)| {
            serde_json::json!({
                "engine": out.report.engine.as_str(),
                "name": name,
                "node_count": out.node_count,
                "result_digest": out.result_digest.as_str(),
            })
        })
        .collect();
    let bytes = canonical_json_bytes(&serde_json::json!({ "runs": entries }))
        .expect("guard serialization");
    canonical_hash(HashDomain::BenchGuard, &bytes)
}
