//! Construction counters and timers.
//!
//! All counters are atomics so engines can bump them from `&self`.
//! Counters do not influence search decisions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Live counters of one constructor.
#[derive(Debug, Default)]
pub struct ConstructionStats {
    constructed_nodes: AtomicU64,
    closed_3i: AtomicU64,
    closed_3ii: AtomicU64,
    depth_skipped: AtomicU64,
    reused_labels: AtomicU64,
    reused_nodes: AtomicU64,
    pruning_events: AtomicU64,
    cleaned_nodes: AtomicU64,
    labeler_calls: AtomicU64,
    label_nanos: AtomicU64,
    session_nanos: AtomicU64,
    path_label_nanos: AtomicU64,
    /// Start of the current wait for the next path label; `None` outside a session.
    path_label_mark: Mutex<Option<Instant>>,
}

/// Counter kinds for [`ConstructionStats::incr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    ConstructedNodes,
    Closed3i,
    Closed3ii,
    DepthSkipped,
    ReusedLabels,
    ReusedNodes,
    PruningEvents,
    CleanedNodes,
    LabelerCalls,
}

impl ConstructionStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, counter: Counter) -> &AtomicU64 {
        match counter {
            Counter::ConstructedNodes => &self.constructed_nodes,
            Counter::Closed3i => &self.closed_3i,
            Counter::Closed3ii => &self.closed_3ii,
            Counter::DepthSkipped => &self.depth_skipped,
            Counter::ReusedLabels => &self.reused_labels,
            Counter::ReusedNodes => &self.reused_nodes,
            Counter::PruningEvents => &self.pruning_events,
            Counter::CleanedNodes => &self.cleaned_nodes,
            Counter::LabelerCalls => &self.labeler_calls,
        }
    }

    pub fn incr(&self, counter: Counter) {
        self.add(counter, 1);
    }

    pub fn add(&self, counter: Counter, n: u64) {
        self.slot(counter).fetch_add(n, Ordering::Relaxed);
    }

    #[must_use]
    pub fn get(&self, counter: Counter) -> u64 {
        self.slot(counter).load(Ordering::Relaxed)
    }

    /// Run `f`, adding its wall time to the labeling timer.
    pub fn time_label<T>(&self, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        add_elapsed(&self.label_nanos, start);
        out
    }

    pub(crate) fn record_session(&self, start: Instant) {
        add_elapsed(&self.session_nanos, start);
        *self.path_label_mark.lock() = None;
    }

    /// Start waiting for the next path label.
    pub(crate) fn start_path_label_timer(&self) {
        *self.path_label_mark.lock() = Some(Instant::now());
    }

    /// A path label was found: bank the wait since the session start or the
    /// previous path label, and start the next wait.
    pub(crate) fn lap_path_label(&self) {
        let mut mark = self.path_label_mark.lock();
        if let Some(start) = mark.replace(Instant::now()) {
            add_elapsed(&self.path_label_nanos, start);
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.constructed_nodes,
            &self.closed_3i,
            &self.closed_3ii,
            &self.depth_skipped,
            &self.reused_labels,
            &self.reused_nodes,
            &self.pruning_events,
            &self.cleaned_nodes,
            &self.labeler_calls,
            &self.label_nanos,
            &self.session_nanos,
            &self.path_label_nanos,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        *self.path_label_mark.lock() = None;
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            constructed_nodes: self.get(Counter::ConstructedNodes),
            closed_3i: self.get(Counter::Closed3i),
            closed_3ii: self.get(Counter::Closed3ii),
            depth_skipped: self.get(Counter::DepthSkipped),
            reused_labels: self.get(Counter::ReusedLabels),
            reused_nodes: self.get(Counter::ReusedNodes),
            pruning_events: self.get(Counter::PruningEvents),
            cleaned_nodes: self.get(Counter::CleanedNodes),
            labeler_calls: self.get(Counter::LabelerCalls),
            label_time: Duration::from_nanos(self.label_nanos.load(Ordering::Relaxed)),
            session_time: Duration::from_nanos(self.session_nanos.load(Ordering::Relaxed)),
            path_label_time: Duration::from_nanos(
                self.path_label_nanos.load(Ordering::Relaxed),
            ),
        }
    }
}

fn add_elapsed(slot: &AtomicU64, start: Instant) {
    let nanos = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);
    slot.fetch_add(nanos, Ordering::Relaxed);
}

/// Point-in-time copy of [`ConstructionStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub constructed_nodes: u64,
    pub closed_3i: u64,
    pub closed_3ii: u64,
    pub depth_skipped: u64,
    pub reused_labels: u64,
    pub reused_nodes: u64,
    pub pruning_events: u64,
    pub cleaned_nodes: u64,
    pub labeler_calls: u64,
    pub label_time: Duration,
    pub session_time: Duration,
    /// Time spent waiting for path labels, up to the last one found.
    pub path_label_time: Duration,
}

impl StatsSnapshot {
    /// Counters only; timers are excluded so the value is reproducible.
    #[must_use]
    pub fn counters_to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "cleaned_nodes": self.cleaned_nodes,
            "closed_3i": self.closed_3i,
            "closed_3ii": self.closed_3ii,
            "constructed_nodes": self.constructed_nodes,
            "depth_skipped": self.depth_skipped,
            "labeler_calls": self.labeler_calls,
            "pruning_events": self.pruning_events,
            "reused_labels": self.reused_labels,
            "reused_nodes": self.reused_nodes,
        })
    }
}
