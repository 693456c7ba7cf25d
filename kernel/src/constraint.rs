//! Constraints, constraint sets, and the set algebra the HS engines rely on.
//!
//! A [`Constraint`] is opaque to every hsdiag crate: it is identified by its
//! name and nothing else. Labels, path labels, conflicts and diagnoses are all
//! [`ConstraintSet`]s. `BTreeSet` (not `HashSet`) keeps expansion order,
//! serialization and digests deterministic.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// A single, named constraint.
///
/// Cloning is an `Arc` bump. Equality, ordering and hashing use the name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Constraint {
    name: Arc<str>,
}

impl Constraint {
    /// Create a constraint with the given name.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    /// The constraint's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Constraint {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A set of constraints: the type of every label and path label.
pub type ConstraintSet = BTreeSet<Constraint>;

/// Build a [`ConstraintSet`] from constraint names.
#[must_use]
pub fn constraint_set<I, S>(names: I) -> ConstraintSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().map(Constraint::new).collect()
}

/// `true` if `a ∩ b ≠ ∅`. Iterates the smaller set.
#[must_use]
pub fn has_intersection(a: &ConstraintSet, b: &ConstraintSet) -> bool {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().any(|c| large.contains(c))
}

/// `set ∪ {extra}` as a new set.
#[must_use]
pub fn with_element(set: &ConstraintSet, extra: &Constraint) -> ConstraintSet {
    let mut out = set.clone();
    out.insert(extra.clone());
    out
}

/// `a \ b` as a new set.
#[must_use]
pub fn difference(a: &ConstraintSet, b: &ConstraintSet) -> ConstraintSet {
    a.difference(b).cloned().collect()
}

/// `true` if no two members of `family` are equal or in a subset relation.
#[must_use]
pub fn is_pairwise_minimal(family: &[ConstraintSet]) -> bool {
    family.iter().enumerate().all(|(i, a)| {
        family
            .iter()
            .enumerate()
            .all(|(j, b)| i == j || !a.is_subset(b))
    })
}

/// Sorted, deduplicated copy of a family of sets.
///
/// Registries keep discovery order; comparisons and digests use this form.
#[must_use]
pub fn sorted_family(family: &[ConstraintSet]) -> Vec<ConstraintSet> {
    let unique: BTreeSet<ConstraintSet> = family.iter().cloned().collect();
    unique.into_iter().collect()
}

/// JSON array of constraint names in set order.
#[must_use]
pub fn set_to_json(set: &ConstraintSet) -> serde_json::Value {
    serde_json::Value::Array(
        set.iter()
            .map(|c| serde_json::Value::String(c.name().to_string()))
            .collect(),
    )
}

/// JSON array of sets, sorted and deduplicated.
#[must_use]
pub fn family_to_json(family: &[ConstraintSet]) -> serde_json::Value {
    serde_json::Value::Array(sorted_family(family).iter().map(set_to_json).collect())
}

/// Display adapter rendering a set as `{A, B, C}` for log lines.
pub struct SetDisplay<'a>(pub &'a ConstraintSet);

impl fmt::Display for SetDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(c.name())?;
        }
        f.write_str("}")
    }
}

/// Display adapter rendering a family as `[{A, B}, {C}]`.
pub struct FamilyDisplay<'a>(pub &'a [ConstraintSet]);

impl fmt::Display for FamilyDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, set) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", SetDisplay(set))?;
        }
        f.write_str("]")
    }
}
