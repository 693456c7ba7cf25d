//! Driver lifecycle lock tests: failure propagation, reset, and disposal.
//!
//! Proves:
//! 1. A labeler failure aborts the run and keeps partial results
//! 2. Checker failures surface as labeler errors through the runner
//! 3. `reset_engine` followed by `construct` reproduces the first report
//! 4. Calling `construct` again on a drained driver changes nothing
//! 5. `dispose` hands back the labeler with its state

use std::error::Error as _;

use hsdiag_harness::checker::ConflictOracle;
use hsdiag_harness::labelers::quickxplain::QuickXPlainLabeler;
use hsdiag_harness::models;
use hsdiag_harness::runner::{run, RunError};
use hsdiag_kernel::constraint::{constraint_set, ConstraintSet};
use hsdiag_search::construct::{HsDag, HsTree};
use hsdiag_search::contract::LabelerKind;
use hsdiag_search::error::HsError;
use hsdiag_search::policy::ConstructorPolicy;
use hsdiag_search::pruning::EngineKind;
use lock_tests::scripted::{ScriptError, ScriptedLabeler};

fn abcd_scripted() -> ScriptedLabeler {
    ScriptedLabeler::new(LabelerKind::Conflict, models::abcd().conflicts)
}

// ---------------------------------------------------------------------------
// 1. Labeler failure
// ---------------------------------------------------------------------------

#[test]
fn labeler_failure_keeps_partial_results() {
    // Call 1 labels the root with both conflicts, call 2 finds {A,B},
    // call 3 is refused.
    let mut tree = HsTree::new(abcd_scripted().failing_after(2), ConstructorPolicy::default()).unwrap();
    let err = tree.construct().unwrap_err();

    let HsError::Labeler { source } = &err else {
        panic!("expected a labeler error, got {err}");
    };
    let script = source.downcast_ref::<ScriptError>().unwrap();
    assert_eq!(script.call, 3);
    assert!(err.source().is_some());

    assert_eq!(tree.conflicts().len(), 2);
    assert_eq!(tree.diagnoses(), vec![constraint_set(["A", "B"])]);
    assert!(tree.open_len() > 0);
}

#[test]
fn failure_at_the_root_leaves_an_empty_graph() {
    let mut dag = HsDag::new(abcd_scripted().failing_after(0), ConstructorPolicy::default()).unwrap();
    assert!(matches!(dag.construct(), Err(HsError::Labeler { .. })));
    assert!(dag.graph().is_empty());
    assert!(dag.conflicts().is_empty());
}

// ---------------------------------------------------------------------------
// 2. Checker failure
// ---------------------------------------------------------------------------

#[test]
fn checker_budget_surfaces_through_the_runner() {
    let model = models::camera();
    let oracle = ConflictOracle::new(model.conflicts.clone()).with_check_budget(2);
    let labeler = QuickXPlainLabeler::new(oracle, model.universe(), ConstraintSet::new());
    let err = run(EngineKind::Dag, labeler, ConstructorPolicy::default()).unwrap_err();
    assert!(matches!(err, RunError::Construction(HsError::Labeler { .. })));
    assert!(err.to_string().contains("budget"), "{err}");
}

// ---------------------------------------------------------------------------
// 3 + 4. Reset and re-entry
// ---------------------------------------------------------------------------

#[test]
fn reset_reproduces_the_report() {
    let model = models::disjoint_pairs(3);
    let labeler = QuickXPlainLabeler::new(model.oracle(), model.universe(), ConstraintSet::new());
    let mut dag = HsDag::new(labeler, ConstructorPolicy::default()).unwrap();
    dag.construct().unwrap();
    let first = dag.report().digest().unwrap();
    let first_graph = dag.graph().digest().unwrap();

    dag.reset_engine();
    assert!(dag.graph().is_empty());
    assert!(dag.conflicts().is_empty());
    assert_eq!(dag.stats().snapshot().labeler_calls, 0);

    dag.construct().unwrap();
    assert_eq!(dag.report().digest().unwrap(), first);
    assert_eq!(dag.graph().digest().unwrap(), first_graph);
}

#[test]
fn reset_keeps_seed_labels() {
    let policy = ConstructorPolicy::default().with_initial_labels(vec![constraint_set(["B", "D"])]);
    let mut tree = HsTree::new(abcd_scripted(), policy).unwrap();
    tree.construct().unwrap();
    tree.reset_engine();
    assert_eq!(tree.conflicts(), vec![constraint_set(["B", "D"])]);
    tree.construct().unwrap();
    assert_eq!(tree.graph().root().unwrap().label(), Some(&constraint_set(["B", "D"])));
}

#[test]
fn construct_on_a_drained_driver_is_a_no_op() {
    let mut tree = HsTree::new(abcd_scripted(), ConstructorPolicy::default()).unwrap();
    tree.construct().unwrap();
    let before = tree.report();
    let nodes = tree.graph().len();
    tree.construct().unwrap();
    assert_eq!(tree.report().result_digest().unwrap(), before.result_digest().unwrap());
    assert_eq!(tree.graph().len(), nodes);
    assert_eq!(tree.stats().snapshot().labeler_calls, before.stats.labeler_calls);
}

// ---------------------------------------------------------------------------
// 5. Dispose
// ---------------------------------------------------------------------------

#[test]
fn dispose_returns_the_labeler() {
    let mut tree = HsTree::new(abcd_scripted(), ConstructorPolicy::default()).unwrap();
    tree.construct().unwrap();
    let calls = tree.stats().snapshot().labeler_calls;
    let labeler = tree.dispose();
    assert_eq!(u64::try_from(labeler.calls()).unwrap(), calls);
}
