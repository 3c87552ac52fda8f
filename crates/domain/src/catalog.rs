use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::permission::{PermissionRecord, action, dedup_by_resource};

/// Universe of protectable resources with the maximum action set of each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PermissionRecord>", into = "Vec<PermissionRecord>")]
pub struct PermissionCatalog {
    records: Vec<PermissionRecord>,
}

impl PermissionCatalog {
    /// Creates a catalog, keeping the first record per resource.
    #[must_use]
    pub fn new(records: impl IntoIterator<Item = PermissionRecord>) -> Self {
        Self {
            records: dedup_by_resource(records),
        }
    }

    /// Returns the built-in catalog of console resources.
    #[must_use]
    pub fn standard() -> Self {
        use action::{
            APPROVE, ARCHIVE, CREATE, DELETE, EDIT, EXPORT, MANAGE, REJECT, VERIFY, VIEW,
        };

        Self::new([
            PermissionRecord::new("dashboard", [VIEW]),
            PermissionRecord::new("properties", [VIEW, CREATE, EDIT, DELETE, ARCHIVE, EXPORT]),
            PermissionRecord::new("investors", [VIEW, CREATE, EDIT, DELETE, EXPORT]),
            PermissionRecord::new("transactions", [VIEW, CREATE, EDIT, APPROVE, REJECT, EXPORT]),
            PermissionRecord::new("kyc", [VIEW, VERIFY, EXPORT]),
            PermissionRecord::new("kyc:approval", [VIEW, APPROVE, REJECT]),
            PermissionRecord::new("notifications", [VIEW, CREATE, DELETE, MANAGE]),
            PermissionRecord::new("users", [VIEW, CREATE, EDIT, DELETE, MANAGE]),
            PermissionRecord::new("roles", [VIEW, CREATE, EDIT, DELETE, MANAGE]),
            PermissionRecord::new("groups", [VIEW, CREATE, EDIT, DELETE, MANAGE]),
            PermissionRecord::new("reports", [VIEW, EXPORT]),
            PermissionRecord::new("settings", [VIEW, EDIT, MANAGE]),
        ])
    }

    /// Returns catalog records in display order.
    #[must_use]
    pub fn records(&self) -> &[PermissionRecord] {
        self.records.as_slice()
    }

    /// Finds the catalog record for a resource.
    #[must_use]
    pub fn get(&self, resource: &str) -> Option<&PermissionRecord> {
        self.records
            .iter()
            .find(|record| record.resource() == resource)
    }

    /// Returns whether the resource is known.
    #[must_use]
    pub fn contains(&self, resource: &str) -> bool {
        self.get(resource).is_some()
    }

    /// Returns the actions the catalog offers for a resource.
    #[must_use]
    pub fn offered_actions(&self, resource: &str) -> Option<&BTreeSet<String>> {
        self.get(resource).map(PermissionRecord::actions)
    }

    /// Returns the number of resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the catalog has no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<PermissionRecord>> for PermissionCatalog {
    fn from(records: Vec<PermissionRecord>) -> Self {
        Self::new(records)
    }
}

impl From<PermissionCatalog> for Vec<PermissionRecord> {
    fn from(catalog: PermissionCatalog) -> Self {
        catalog.records
    }
}

#[cfg(test)]
mod tests {
    use super::PermissionCatalog;
    use crate::permission::{PermissionRecord, action};

    #[test]
    fn catalog_deduplicates_resources() {
        let catalog = PermissionCatalog::new([
            PermissionRecord::new("properties", [action::VIEW]),
            PermissionRecord::new("properties", [action::VIEW, action::EDIT]),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.offered_actions("properties").map(|actions| actions.len()),
            Some(1)
        );
    }

    #[test]
    fn standard_catalog_covers_kyc_review() {
        let catalog = PermissionCatalog::standard();

        assert!(catalog.contains("kyc:approval"));
        assert!(
            catalog
                .get("kyc:approval")
                .is_some_and(|record| record.allows(action::APPROVE))
        );
        assert!(!catalog.contains("chat"));
    }

    #[test]
    fn catalog_deserializes_from_record_array() {
        let catalog: Result<PermissionCatalog, _> = serde_json::from_str(
            r#"[
                { "resource": "users", "actions": ["view"] },
                { "resource": "users", "actions": ["edit"] }
            ]"#,
        );

        assert!(catalog.is_ok_and(|catalog| catalog.len() == 1));
    }
}
