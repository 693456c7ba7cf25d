//! Canonical scenario lock: conflicts {A,C} and {B,D} under QuickXPlain.
//!
//! Proves:
//! 1. Both drivers find the two conflicts and the four minimal diagnoses
//! 2. Labeler calls, label reuse and node counts are pinned
//! 3. Every terminal node's path label is a recorded diagnosis
//! 4. The report is canonical and its digest is stable across reruns

use hsdiag_harness::checker::ConflictOracle;
use hsdiag_harness::labelers::quickxplain::QuickXPlainLabeler;
use hsdiag_harness::models;
use hsdiag_kernel::constraint::{constraint_set, sorted_family, ConstraintSet};
use hsdiag_search::construct::{HsDag, HsTree};
use hsdiag_search::node::NodeStatus;
use hsdiag_search::policy::ConstructorPolicy;

fn labeler() -> QuickXPlainLabeler<ConflictOracle> {
    let model = models::abcd();
    QuickXPlainLabeler::new(model.oracle(), model.universe(), ConstraintSet::new())
}

fn expected_conflicts() -> Vec<ConstraintSet> {
    vec![constraint_set(["A", "C"]), constraint_set(["B", "D"])]
}

fn expected_diagnoses() -> Vec<ConstraintSet> {
    vec![
        constraint_set(["A", "B"]),
        constraint_set(["A", "D"]),
        constraint_set(["B", "C"]),
        constraint_set(["C", "D"]),
    ]
}

// ---------------------------------------------------------------------------
// 1. Results
// ---------------------------------------------------------------------------

#[test]
fn hs_tree_finds_all_minimal_diagnoses() {
    let mut tree = HsTree::new(labeler(), ConstructorPolicy::default()).unwrap();
    tree.construct().unwrap();
    assert_eq!(tree.conflicts(), expected_conflicts());
    assert_eq!(sorted_family(&tree.diagnoses()), expected_diagnoses());
}

#[test]
fn hs_dag_finds_all_minimal_diagnoses() {
    let mut dag = HsDag::new(labeler(), ConstructorPolicy::default()).unwrap();
    dag.construct().unwrap();
    assert_eq!(dag.conflicts(), expected_conflicts());
    assert_eq!(sorted_family(&dag.diagnoses()), expected_diagnoses());
}

// ---------------------------------------------------------------------------
// 2. Counters
// ---------------------------------------------------------------------------

#[test]
fn counters_are_pinned() {
    let mut tree = HsTree::new(labeler(), ConstructorPolicy::default()).unwrap();
    tree.construct().unwrap();
    let stats = tree.stats().snapshot();

    // root, {A}, and the four level-two leaves; {C} reuses {B,D}.
    assert_eq!(stats.labeler_calls, 6);
    assert_eq!(stats.reused_labels, 1);
    assert_eq!(stats.constructed_nodes, 7);
    assert_eq!(tree.graph().len(), 7);
    assert_eq!(stats.closed_3i + stats.closed_3ii, 0);
    assert_eq!(tree.graph().status_counts(), [3, 0, 0, 4]);
    assert_eq!(tree.open_len(), 0);
}

// ---------------------------------------------------------------------------
// 3. Terminal nodes
// ---------------------------------------------------------------------------

#[test]
fn checked_paths_are_the_diagnoses() {
    let mut dag = HsDag::new(labeler(), ConstructorPolicy::default()).unwrap();
    dag.construct().unwrap();
    let checked: Vec<ConstraintSet> = dag
        .graph()
        .iter()
        .filter(|n| n.status() == NodeStatus::Checked)
        .map(|n| n.path_label().clone())
        .collect();
    assert_eq!(sorted_family(&checked), expected_diagnoses());
    for node in dag.graph().iter().filter(|n| n.status() == NodeStatus::Checked) {
        assert!(node.label().is_none(), "terminal {node} carries a label");
        assert!(node.children().is_empty(), "terminal {node} was expanded");
    }
}

// ---------------------------------------------------------------------------
// 4. Report
// ---------------------------------------------------------------------------

#[test]
fn report_is_canonical_and_stable() {
    let mut first = HsTree::new(labeler(), ConstructorPolicy::default()).unwrap();
    first.construct().unwrap();
    let mut second = HsTree::new(labeler(), ConstructorPolicy::default()).unwrap();
    second.construct().unwrap();

    let a = first.report();
    let b = second.report();
    assert_eq!(a.to_canonical_json_bytes().unwrap(), b.to_canonical_json_bytes().unwrap());
    assert_eq!(a.digest().unwrap(), b.digest().unwrap());
    assert_eq!(first.graph().digest().unwrap(), second.graph().digest().unwrap());

    let text = String::from_utf8(a.to_canonical_json_bytes().unwrap()).unwrap();
    assert!(text.contains(r#""diagnoses":[["A","B"],["A","D"],["B","C"],["C","D"]]"#));
    assert!(text.contains(r#""engine":"hs_tree""#));
    assert!(text.contains(r#""labeler_kind":"conflict""#));
    assert!(text.contains(r#""schema_version":"hsdiag.construction_report.v1""#));
}
