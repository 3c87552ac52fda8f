//! Resource/action grants and the list rules shared by catalogs and selections.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// Well-known action tags offered by the console.
pub mod action {
    /// Read access.
    pub const VIEW: &str = "view";
    /// Create new records.
    pub const CREATE: &str = "create";
    /// Modify existing records.
    pub const EDIT: &str = "edit";
    /// Delete records.
    pub const DELETE: &str = "delete";
    /// Approve a pending review.
    pub const APPROVE: &str = "approve";
    /// Reject a pending review.
    pub const REJECT: &str = "reject";
    /// Administer the resource.
    pub const MANAGE: &str = "manage";
    /// Export data.
    pub const EXPORT: &str = "export";
    /// Verify submitted documents.
    pub const VERIFY: &str = "verify";
    /// Archive records.
    pub const ARCHIVE: &str = "archive";
}

/// A single resource together with the actions granted on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionRecord {
    resource: String,
    #[serde(default)]
    actions: BTreeSet<String>,
}

impl PermissionRecord {
    /// Creates a record; duplicate actions collapse.
    #[must_use]
    pub fn new<I, S>(resource: impl Into<String>, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            resource: resource.into(),
            actions: actions.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a record that grants nothing yet.
    #[must_use]
    pub fn empty(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            actions: BTreeSet::new(),
        }
    }

    /// Returns the resource identifier.
    #[must_use]
    pub fn resource(&self) -> &str {
        self.resource.as_str()
    }

    /// Returns the granted actions in stable order.
    #[must_use]
    pub fn actions(&self) -> &BTreeSet<String> {
        &self.actions
    }

    /// Returns whether the action is granted.
    #[must_use]
    pub fn allows(&self, action: &str) -> bool {
        self.actions.contains(action)
    }

    /// Adds the action when absent, removes it when present.
    ///
    /// Returns whether the action is granted afterwards.
    pub fn toggle(&mut self, action: &str) -> bool {
        if self.actions.remove(action) {
            false
        } else {
            self.actions.insert(action.to_owned());
            true
        }
    }

    /// Returns the number of granted actions.
    #[must_use]
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Returns whether no action is granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// A `(resource, action)` pair asked of the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionCheck {
    /// Resource identifier.
    pub resource: String,
    /// Action tag.
    pub action: String,
}

impl PermissionCheck {
    /// Creates a check for one resource/action pair.
    #[must_use]
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }
}

impl From<(&str, &str)> for PermissionCheck {
    fn from((resource, action): (&str, &str)) -> Self {
        Self::new(resource, action)
    }
}

/// Keeps the first record seen for every resource, preserving first-seen order.
#[must_use]
pub fn dedup_by_resource<I>(records: I) -> Vec<PermissionRecord>
where
    I: IntoIterator<Item = PermissionRecord>,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.resource.clone()))
        .collect()
}

/// Concatenates group grants in membership order and deduplicates the result.
///
/// Earlier groups win when several grant the same resource.
#[must_use]
pub fn merge_grants<I, G>(groups: I) -> Vec<PermissionRecord>
where
    I: IntoIterator<Item = G>,
    G: IntoIterator<Item = PermissionRecord>,
{
    dedup_by_resource(groups.into_iter().flatten())
}
