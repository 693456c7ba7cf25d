//! Runs every catalog model through both drivers with both labelers and
//! prints one deterministic line per run for cross-process comparison.
//!
//! Usage: `construct_fixture`
//! Output: one line per run, space-separated `key=value` pairs:
//!   `model`, `engine`, `labeler`, `digest`, `result_digest`, `nodes`
//! followed by a final `runs=<n>` line.

use hsdiag_harness::labelers::fastdiag::FastDiagLabeler;
use hsdiag_harness::labelers::quickxplain::QuickXPlainLabeler;
use hsdiag_harness::models::catalog;
use hsdiag_harness::runner::{run, RunOutcome};
use hsdiag_kernel::constraint::ConstraintSet;
use hsdiag_search::policy::ConstructorPolicy;
use hsdiag_search::pruning::EngineKind;

fn print_line(model: &str, labeler: &str, out: &RunOutcome) {
    println!(
        "model={model} engine={} labeler={labeler} digest={} result_digest={} nodes={}",
        out.report.engine.as_str(),
        out.digest,
        out.result_digest,
        out.node_count
    );
}

fn main() {
    let mut runs = 0usize;
    for model in catalog() {
        for engine in [EngineKind::Tree, EngineKind::Dag] {
            let qx = QuickXPlainLabeler::new(model.oracle(), model.universe(), ConstraintSet::new());
            let out = run(engine, qx, ConstructorPolicy::default()).expect("quickxplain run failed");
            print_line(&model.name, "quickxplain", &out);

            let fd = FastDiagLabeler::new(model.oracle(), model.universe(), ConstraintSet::new());
            let out = run(engine, fd, ConstructorPolicy::default()).expect("fastdiag run failed");
            print_line(&model.name, "fastdiag", &out);
            runs += 2;
        }
    }
    println!("runs={runs}");
}
