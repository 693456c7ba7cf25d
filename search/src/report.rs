//! Construction report: results, policy echo and counters as canonical JSON.
//!
//! Two digests are offered. [`ConstructionReport::digest`] binds everything
//! in the report. [`ConstructionReport::result_digest`] binds only the sorted
//! conflicts and diagnoses, so runs that differ in engine or counters but
//! agree on results share it.

use hsdiag_kernel::constraint::{family_to_json, sorted_family, ConstraintSet};
use hsdiag_kernel::proof::canon::{canonical_json_bytes, CanonError};
use hsdiag_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::contract::LabelerKind;
use crate::policy::ConstructorPolicy;
use crate::pruning::EngineKind;
use crate::stats::StatsSnapshot;

/// Schema identifier embedded in every report.
pub const REPORT_SCHEMA_VERSION: &str = "hsdiag.construction_report.v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionReport {
    pub engine: EngineKind,
    pub labeler_kind: LabelerKind,
    pub policy: ConstructorPolicy,
    /// Sorted, deduplicated.
    pub conflicts: Vec<ConstraintSet>,
    /// Sorted, deduplicated.
    pub diagnoses: Vec<ConstraintSet>,
    pub stats: StatsSnapshot,
}

impl ConstructionReport {
    #[must_use]
    pub fn new(
        engine: EngineKind,
        labeler_kind: LabelerKind,
        policy: &ConstructorPolicy,
        conflicts: &[ConstraintSet],
        diagnoses: &[ConstraintSet],
        stats: StatsSnapshot,
    ) -> Self {
        Self {
            engine,
            labeler_kind,
            policy: policy.clone(),
            conflicts: sorted_family(conflicts),
            diagnoses: sorted_family(diagnoses),
            stats,
        }
    }

    /// Timers are left out so identical runs serialize identically.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "conflicts": family_to_json(&self.conflicts),
            "counters": self.stats.counters_to_json(),
            "diagnoses": family_to_json(&self.diagnoses),
            "engine": self.engine.as_str(),
            "labeler_kind": self.labeler_kind.as_str(),
            "policy": self.policy.to_json_value(),
            "schema_version": REPORT_SCHEMA_VERSION,
        })
    }

    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Hash of the full report.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes()?;
        Ok(canonical_hash(HashDomain::ConstructionReport, &bytes))
    }

    /// Hash of the result families only.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn result_digest(&self) -> Result<ContentHash, CanonError> {
        let value = serde_json::json!({
            "conflicts": family_to_json(&self.conflicts),
            "diagnoses": family_to_json(&self.diagnoses),
        });
        let bytes = canonical_json_bytes(&value)?;
        Ok(canonical_hash(HashDomain::ResultFamily, &bytes))
    }
}
