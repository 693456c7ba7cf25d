//! Concurrency lock tests for the shared pieces of a construction.
//!
//! Proves:
//! 1. Registry appends from many threads are all kept
//! 2. Statistics counters are exact under contention
//! 3. Drivers on separate threads sharing one checker agree on results

use std::sync::Arc;
use std::thread;

use hsdiag_harness::checker::{ConflictOracle, ConsistencyChecker};
use hsdiag_harness::labelers::quickxplain::QuickXPlainLabeler;
use hsdiag_harness::models;
use hsdiag_kernel::constraint::{constraint_set, ConstraintSet};
use hsdiag_search::construct::{HsDag, HsTree};
use hsdiag_search::policy::ConstructorPolicy;
use hsdiag_search::registry::LabelRegistry;
use hsdiag_search::stats::{ConstructionStats, Counter};

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

#[test]
fn registry_keeps_every_concurrent_append() {
    let registry = Arc::new(LabelRegistry::new());
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    registry.push(constraint_set([format!("t{t}"), format!("i{i}")]));
                    // Readers interleave with writers.
                    let _ = registry.any_subset_of(&constraint_set([format!("t{t}")]));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(registry.len(), THREADS * PER_THREAD);
    assert!(registry.contains(&constraint_set(["t3", "i17"])));
}

#[test]
fn stats_counters_are_exact_under_contention() {
    let stats = Arc::new(ConstructionStats::new());
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let stats = Arc::clone(&stats);
            thread::spawn(move || {
                for _ in 0..PER_THREAD {
                    stats.incr(Counter::LabelerCalls);
                    stats.add(Counter::ReusedLabels, 2);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let snap = stats.snapshot();
    let expected = u64::try_from(THREADS * PER_THREAD).unwrap();
    assert_eq!(snap.labeler_calls, expected);
    assert_eq!(snap.reused_labels, 2 * expected);
}

#[test]
fn drivers_sharing_a_checker_agree() {
    let model = models::sliding_windows(6, 3);
    let oracle = Arc::new(ConflictOracle::new(model.conflicts.clone()));
    let universe = model.universe();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let oracle = Arc::clone(&oracle);
            let universe = universe.clone();
            thread::spawn(move || {
                let labeler = QuickXPlainLabeler::new(oracle, universe, ConstraintSet::new());
                let report = if i % 2 == 0 {
                    let mut tree = HsTree::new(labeler, ConstructorPolicy::default()).unwrap();
                    tree.construct().unwrap();
                    tree.report()
                } else {
                    let mut dag = HsDag::new(labeler, ConstructorPolicy::default()).unwrap();
                    dag.construct().unwrap();
                    dag.report()
                };
                report.result_digest().unwrap()
            })
        })
        .collect();
    let digests: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(digests.windows(2).all(|w| w[0] == w[1]));
    assert!(oracle.checks() > 0);
    assert!(!oracle.is_consistent(&universe).unwrap());
}
