//! Immutable secrets hierarchy.
//!
//! A [`Hierarchy`] is built wholesale by a single container decode and never
//! mutated afterwards. Groups own their entries and sub-groups exclusively,
//! so the structure is a tree by construction and safe to read from any
//! number of threads without per-node locking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field name holding the account name of an entry.
pub const FIELD_USERNAME: &str = "UserName";
/// Field name holding the display title of an entry.
pub const FIELD_TITLE: &str = "Title";
/// Field name holding the secret value of an entry.
pub const FIELD_PASSWORD: &str = "Password";
/// Field name holding the associated URL of an entry.
pub const FIELD_URL: &str = "URL";

/// A leaf secret record.
///
/// Fields are free-form name/value pairs; protected values are already
/// decrypted by the time an entry exists. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    fields: HashMap<String, String>,
}

impl Entry {
    /// Create an entry from its decoded fields.
    pub fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Look up a field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Iterate over all fields in the entry.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The account name, if present.
    pub fn username(&self) -> Option<&str> {
        self.field(FIELD_USERNAME)
    }

    /// The display title, if present.
    pub fn title(&self) -> Option<&str> {
        self.field(FIELD_TITLE)
    }

    /// The secret value, if present.
    pub fn password(&self) -> Option<&str> {
        self.field(FIELD_PASSWORD)
    }

    /// The associated URL, if present.
    pub fn url(&self) -> Option<&str> {
        self.field(FIELD_URL)
    }
}

/// A container node holding entries and sub-groups.
///
/// Both sequences preserve the order produced by the decode step; search
/// results depend on that order, so it is never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    name: String,
    entries: Vec<Entry>,
    groups: Vec<Group>,
}

impl Group {
    /// Create a group from its decoded children.
    pub fn new(name: impl Into<String>, entries: Vec<Entry>, groups: Vec<Group>) -> Self {
        Self {
            name: name.into(),
            entries,
            groups,
        }
    }

    /// The group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct entries, in decode order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Sub-groups, in decode order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }
}

/// The full tree of groups and entries produced by one decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    root: Group,
}

impl Hierarchy {
    /// Create a hierarchy rooted at the given group.
    pub fn new(root: Group) -> Self {
        Self { root }
    }

    /// A hierarchy with an empty root group.
    ///
    /// Used as the store state before the first successful load; every
    /// search against it misses.
    pub fn empty() -> Self {
        Self {
            root: Group::new("Root", Vec::new(), Vec::new()),
        }
    }

    /// The top-level group.
    pub fn root(&self) -> &Group {
        &self.root
    }

    /// Total number of entries across all groups.
    pub fn entry_count(&self) -> usize {
        fn count(group: &Group) -> usize {
            group.entries().len() + group.groups().iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }

    /// Total number of groups, including the root.
    pub fn group_count(&self) -> usize {
        fn count(group: &Group) -> usize {
            1 + group.groups().iter().map(count).sum::<usize>()
        }
        count(&self.root)
    }
}
