//! Deterministic multi-field entry search.
//!
//! The search walks the hierarchy pre-order: a group's own entries are
//! scanned before its sub-groups, both in decode order, and the first entry
//! satisfying every criteria field wins. Because the hierarchy is immutable
//! the result is a pure function of (root, criteria).

use std::collections::HashMap;

use crate::hierarchy::{Entry, Group};
use keybridge_common::{Error, Result};

/// Validated search criteria: field name to required value.
///
/// A match requires exact, case-sensitive equality on every field. The
/// constructor rejects an empty mapping, so a `Criteria` value always
/// carries at least one constraint.
#[derive(Debug, Clone)]
pub struct Criteria(HashMap<String, String>);

impl Criteria {
    /// Create criteria from a field/value mapping.
    ///
    /// # Errors
    /// - `InvalidCriteria` if the mapping is empty
    pub fn new(fields: HashMap<String, String>) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::InvalidCriteria(
                "at least one field is required".to_string(),
            ));
        }
        Ok(Self(fields))
    }

    /// Create single-field criteria.
    pub fn field(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut fields = HashMap::new();
        fields.insert(name.into(), value.into());
        Self(fields)
    }

    /// Iterate over the required field/value pairs.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of constrained fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; an empty `Criteria` cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Whether an entry satisfies every criteria field.
///
/// An entry missing a required field never matches.
fn entry_matches(entry: &Entry, criteria: &Criteria) -> bool {
    criteria
        .fields()
        .all(|(name, value)| entry.field(name) == Some(value))
}

/// Locate the first entry matching the criteria, pre-order.
///
/// Scans the group's direct entries in listed order, then recurses into
/// sub-groups in listed order. When several entries match, the shallowest,
/// earliest-listed one is returned.
///
/// # Errors
/// - `EntryNotFound` if no entry in the tree satisfies the criteria
pub fn find_match<'a>(group: &'a Group, criteria: &Criteria) -> Result<&'a Entry> {
    for entry in group.entries() {
        if entry_matches(entry, criteria) {
            return Ok(entry);
        }
    }

    for sub in group.groups() {
        if let Ok(entry) = find_match(sub, criteria) {
            return Ok(entry);
        }
    }

    Err(Error::EntryNotFound)
}
