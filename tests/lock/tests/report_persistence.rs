//! Report persistence and digest binding lock tests.
//!
//! Proves:
//! 1. Reports written to disk read back byte-identical and verified
//! 2. Digests are sha256 over domain prefix plus canonical bytes,
//!    recomputable without the kernel
//! 3. Tree and DAG reports differ while their result digests agree
//! 4. Policy snapshots bind every policy field

use sha2::{Digest, Sha256};

use hsdiag_harness::labelers::quickxplain::QuickXPlainLabeler;
use hsdiag_harness::models;
use hsdiag_harness::report_dir::{read_report_dir, write_report_dir, ReportDirError, DIGEST_FILENAME};
use hsdiag_harness::runner::{run, RunOutcome};
use hsdiag_kernel::constraint::{constraint_set, ConstraintSet};
use hsdiag_kernel::proof::hash::HashDomain;
use hsdiag_search::policy::ConstructorPolicy;
use hsdiag_search::pruning::EngineKind;

fn outcome(engine: EngineKind) -> RunOutcome {
    let model = models::camera();
    let labeler = QuickXPlainLabeler::new(model.oracle(), model.universe(), ConstraintSet::new());
    run(engine, labeler, ConstructorPolicy::default()).unwrap()
}

fn sha256_hex(domain: HashDomain, bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    hasher.update(bytes);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

// ---------------------------------------------------------------------------
// 1. Disk round-trip
// ---------------------------------------------------------------------------

#[test]
fn report_dir_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let out = outcome(EngineKind::Tree);
    write_report_dir(&out, dir.path()).unwrap();

    let stored = read_report_dir(dir.path()).unwrap();
    assert_eq!(stored.bytes, out.report_bytes);
    assert_eq!(stored.digest, out.digest);
    assert_eq!(stored.report, out.report.to_json_value());
}

#[test]
fn rewriting_a_report_dir_replaces_it() {
    let dir = tempfile::tempdir().unwrap();
    write_report_dir(&outcome(EngineKind::Tree), dir.path()).unwrap();
    let dag = outcome(EngineKind::Dag);
    write_report_dir(&dag, dir.path()).unwrap();
    assert_eq!(read_report_dir(dir.path()).unwrap().digest, dag.digest);
}

#[test]
fn malformed_digest_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_report_dir(&outcome(EngineKind::Dag), dir.path()).unwrap();
    std::fs::write(dir.path().join(DIGEST_FILENAME), "not-a-digest").unwrap();
    assert!(matches!(
        read_report_dir(dir.path()),
        Err(ReportDirError::MalformedDigest { .. })
    ));
}

#[test]
fn missing_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent");
    assert!(matches!(
        read_report_dir(&missing),
        Err(ReportDirError::Missing { .. })
    ));
}

// ---------------------------------------------------------------------------
// 2. Independent digest recomputation
// ---------------------------------------------------------------------------

#[test]
fn report_digest_recomputes_independently() {
    let out = outcome(EngineKind::Dag);
    assert_eq!(
        out.digest.as_str(),
        sha256_hex(HashDomain::ConstructionReport, &out.report_bytes)
    );
}

#[test]
fn result_digest_recomputes_independently() {
    let out = outcome(EngineKind::Tree);
    let families = serde_json::json!({
        "conflicts": out.report.to_json_value()["conflicts"],
        "diagnoses": out.report.to_json_value()["diagnoses"],
    });
    // serde_json without preserve_order keeps object keys sorted.
    let bytes = serde_json::to_vec(&families).unwrap();
    assert_eq!(
        out.result_digest.as_str(),
        sha256_hex(HashDomain::ResultFamily, &bytes)
    );
}

// ---------------------------------------------------------------------------
// 3. Engine binding
// ---------------------------------------------------------------------------

#[test]
fn engine_is_bound_by_the_report_digest_only() {
    let tree = outcome(EngineKind::Tree);
    let dag = outcome(EngineKind::Dag);
    assert_ne!(tree.digest, dag.digest);
    assert_eq!(tree.result_digest, dag.result_digest);
}

// ---------------------------------------------------------------------------
// 4. Policy binding
// ---------------------------------------------------------------------------

#[test]
fn policy_digest_binds_every_field() {
    let base = ConstructorPolicy::default();
    let variants = [
        base.clone().with_max_diagnoses(3),
        base.clone().with_max_conflicts(3),
        base.clone().with_max_depth(3),
        base.clone().with_initial_labels(vec![constraint_set(["A"])]),
    ];
    let base_digest = base.digest().unwrap();
    for (i, v) in variants.iter().enumerate() {
        assert_ne!(v.digest().unwrap(), base_digest, "variant {i}");
        for (j, w) in variants.iter().enumerate().skip(i + 1) {
            assert_ne!(v.digest().unwrap(), w.digest().unwrap(), "variants {i} and {j}");
        }
    }
}
