use std::sync::Arc;

use propvest_domain::{PermissionCatalog, PermissionRecord, dedup_by_resource};

/// Receives the full selection after every editor mutation.
pub trait PermissionSetObserver: Send + Sync {
    /// Called with the complete, deduplicated selection.
    fn permissions_changed(&self, permissions: &[PermissionRecord]);
}

impl<F> PermissionSetObserver for F
where
    F: Fn(&[PermissionRecord]) + Send + Sync,
{
    fn permissions_changed(&self, permissions: &[PermissionRecord]) {
        self(permissions);
    }
}

/// Totals shown next to the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionSetSummary {
    /// Number of included resources.
    pub resource_count: usize,
    /// Sum of granted actions across included resources.
    pub action_count: usize,
}

/// Local edit buffer for composing a group's or user's permissions from the catalog.
///
/// Available resources are always derived as catalog minus selection, so a
/// catalog resource is listed on exactly one side.
pub struct PermissionSetEditor {
    catalog: Arc<PermissionCatalog>,
    selected: Vec<PermissionRecord>,
    observer: Option<Box<dyn PermissionSetObserver>>,
}

impl PermissionSetEditor {
    /// Creates an editor over a catalog with an initial selection.
    #[must_use]
    pub fn new(
        catalog: Arc<PermissionCatalog>,
        selected: impl IntoIterator<Item = PermissionRecord>,
    ) -> Self {
        Self {
            catalog,
            selected: dedup_by_resource(selected),
            observer: None,
        }
    }

    /// Registers the observer notified after each change.
    #[must_use]
    pub fn with_observer(mut self, observer: impl PermissionSetObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Lists catalog resources not yet included, filtered by resource name.
    #[must_use]
    pub fn available(&self, filter: &str) -> Vec<&PermissionRecord> {
        self.catalog
            .records()
            .iter()
            .filter(|record| !self.is_included(record.resource()))
            .filter(|record| matches_filter(record.resource(), filter))
            .collect()
    }

    /// Lists included resources, filtered by resource name.
    #[must_use]
    pub fn included(&self, filter: &str) -> Vec<&PermissionRecord> {
        self.selected
            .iter()
            .filter(|record| matches_filter(record.resource(), filter))
            .collect()
    }

    /// Moves an available resource into the selection with no actions granted.
    ///
    /// Returns `false` when the resource is unknown or already included.
    pub fn add_resource(&mut self, resource: &str) -> bool {
        if self.is_included(resource) || !self.catalog.contains(resource) {
            return false;
        }

        self.selected.push(PermissionRecord::empty(resource));
        self.notify();
        true
    }

    /// Removes a resource and its action selections.
    ///
    /// Returns `false` when the resource was not included.
    pub fn remove_resource(&mut self, resource: &str) -> bool {
        let Some(index) = self.position(resource) else {
            return false;
        };

        self.selected.remove(index);
        self.notify();
        true
    }

    /// Grants the action when absent and revokes it when present.
    ///
    /// Only included resources can be toggled, and only with actions the
    /// catalog offers for them. Returns whether the selection changed.
    pub fn toggle_action(&mut self, resource: &str, action: &str) -> bool {
        let Some(index) = self.position(resource) else {
            return false;
        };

        if let Some(offered) = self.catalog.offered_actions(resource)
            && !offered.contains(action)
        {
            return false;
        }

        self.selected[index].toggle(action);
        self.notify();
        true
    }

    /// Returns totals computed from the current selection.
    #[must_use]
    pub fn summary(&self) -> PermissionSetSummary {
        PermissionSetSummary {
            resource_count: self.selected.len(),
            action_count: self
                .selected
                .iter()
                .map(PermissionRecord::action_count)
                .sum(),
        }
    }

    /// Returns the current selection.
    #[must_use]
    pub fn permissions(&self) -> &[PermissionRecord] {
        self.selected.as_slice()
    }

    /// Consumes the editor and returns the selection for submission.
    #[must_use]
    pub fn into_permissions(self) -> Vec<PermissionRecord> {
        self.selected
    }

    /// Returns the catalog the editor offers resources from.
    #[must_use]
    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    fn is_included(&self, resource: &str) -> bool {
        self.position(resource).is_some()
    }

    fn position(&self, resource: &str) -> Option<usize> {
        self.selected
            .iter()
            .position(|record| record.resource() == resource)
    }

    fn notify(&self) {
        if let Some(observer) = &self.observer {
            observer.permissions_changed(self.selected.as_slice());
        }
    }
}

fn matches_filter(resource: &str, filter: &str) -> bool {
    let needle = filter.trim().to_lowercase();
    needle.is_empty() || resource.to_lowercase().contains(needle.as_str())
}
