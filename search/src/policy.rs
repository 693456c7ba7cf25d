//! Constructor policy: stop thresholds, depth bound, seed labels.

use hsdiag_kernel::constraint::{is_pairwise_minimal, set_to_json, Constraint, ConstraintSet};
use hsdiag_kernel::proof::canon::{canonical_json_bytes, CanonError};
use hsdiag_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::error::HsError;

/// Sentinel for "no limit" on the result-count thresholds.
pub const UNBOUNDED: i32 = -1;

/// Recognized configuration of an HS construction.
///
/// Thresholds are checked after every label discovery. `max_depth = 0`
/// means the depth is unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorPolicy {
    /// Stop once this many diagnoses are known. `-1` = unbounded.
    pub max_diagnoses: i32,
    /// Stop once this many conflicts are known. `-1` = unbounded.
    pub max_conflicts: i32,
    /// Nodes deeper than this are never labeled. `0` = unbounded.
    pub max_depth: i32,
    /// Labels known before the run, e.g. conflicts from an earlier session.
    pub initial_labels: Vec<ConstraintSet>,
}

impl Default for ConstructorPolicy {
    fn default() -> Self {
        Self {
            max_diagnoses: UNBOUNDED,
            max_conflicts: UNBOUNDED,
            max_depth: 0,
            initial_labels: Vec::new(),
        }
    }
}

impl ConstructorPolicy {
    #[must_use]
    pub fn with_max_diagnoses(mut self, n: i32) -> Self {
        self.max_diagnoses = n;
        self
    }

    #[must_use]
    pub fn with_max_conflicts(mut self, n: i32) -> Self {
        self.max_conflicts = n;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: i32) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn with_initial_labels(mut self, labels: Vec<ConstraintSet>) -> Self {
        self.initial_labels = labels;
        self
    }

    /// Reject thresholds below the sentinel, negative depth, empty seeds and
    /// seed families where one label contains another.
    ///
    /// # Errors
    ///
    /// Returns [`HsError::InvalidPolicy`] naming the offending field.
    pub fn validate(&self) -> Result<(), HsError> {
        if self.max_diagnoses < UNBOUNDED {
            return Err(invalid(format!(
                "max_diagnoses must be -1 or non-negative, got {}",
                self.max_diagnoses
            )));
        }
        if self.max_conflicts < UNBOUNDED {
            return Err(invalid(format!(
                "max_conflicts must be -1 or non-negative, got {}",
                self.max_conflicts
            )));
        }
        if self.max_depth < 0 {
            return Err(invalid(format!(
                "max_depth must be non-negative, got {}",
                self.max_depth
            )));
        }
        if let Some(i) = self.initial_labels.iter().position(ConstraintSet::is_empty) {
            return Err(invalid(format!("initial_labels[{i}] is empty")));
        }
        if !is_pairwise_minimal(&self.initial_labels) {
            return Err(invalid(
                "initial_labels must not contain duplicates or supersets of each other".into(),
            ));
        }
        Ok(())
    }

    /// Depth bound as a level, `None` when unbounded.
    #[must_use]
    pub fn depth_limit(&self) -> Option<u32> {
        u32::try_from(self.max_depth).ok().filter(|d| *d > 0)
    }

    /// Parse a policy object. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`HsError::InvalidPolicy`] for unknown keys, wrongly typed
    /// values, or a policy that fails [`validate`](Self::validate).
    pub fn from_json(value: &serde_json::Value) -> Result<Self, HsError> {
        let obj = value
            .as_object()
            .ok_or_else(|| invalid("policy must be a JSON object".into()))?;
        let mut policy = Self::default();
        for (key, v) in obj {
            match key.as_str() {
                "max_diagnoses" => policy.max_diagnoses = int_field(key, v)?,
                "max_conflicts" => policy.max_conflicts = int_field(key, v)?,
                "max_depth" => policy.max_depth = int_field(key, v)?,
                "initial_labels" => policy.initial_labels = labels_field(v)?,
                other => return Err(invalid(format!("unknown policy key {other:?}"))),
            }
        }
        policy.validate()?;
        Ok(policy)
    }

    /// Policy echo with sorted keys, as embedded in reports.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "initial_labels": self.initial_labels.iter().map(set_to_json).collect::<Vec<_>>(),
            "max_conflicts": self.max_conflicts,
            "max_depth": self.max_depth,
            "max_diagnoses": self.max_diagnoses,
        })
    }

    /// Content hash of the policy echo.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = canonical_json_bytes(&self.to_json_value())?;
        Ok(canonical_hash(HashDomain::PolicySnapshot, &bytes))
    }
}

fn invalid(detail: String) -> HsError {
    HsError::InvalidPolicy { detail }
}

fn int_field(key: &str, v: &serde_json::Value) -> Result<i32, HsError> {
    v.as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| invalid(format!("{key} must be a 32-bit integer")))
}

fn labels_field(v: &serde_json::Value) -> Result<Vec<ConstraintSet>, HsError> {
    let arr = v
        .as_array()
        .ok_or_else(|| invalid("initial_labels must be an array of arrays".into()))?;
    arr.iter()
        .map(|set| {
            set.as_array()
                .ok_or_else(|| invalid("initial_labels entries must be arrays".into()))?
                .iter()
                .map(|name| {
                    name.as_str()
                        .map(Constraint::new)
                        .ok_or_else(|| invalid("constraint names must be strings".into()))
                })
                .collect::<Result<ConstraintSet, _>>()
        })
        .collect()
}
