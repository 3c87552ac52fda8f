use std::sync::Arc;

use propvest_core::{AppResult, SessionContext};
use propvest_domain::{PermissionRecord, dedup_by_resource};
use tracing::info;

use crate::{AssignmentTarget, PermissionAssignmentRepository};

/// Application service submitting edited permission sets for persistence.
#[derive(Clone)]
pub struct PermissionAssignmentService {
    repository: Arc<dyn PermissionAssignmentRepository>,
}

impl PermissionAssignmentService {
    /// Creates a new service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn PermissionAssignmentRepository>) -> Self {
        Self { repository }
    }

    /// Saves the edited permissions for a group or user.
    ///
    /// Repeated resources keep their first record. Included resources without
    /// actions are saved as they are. Returns the list that was submitted.
    pub async fn submit(
        &self,
        session: &SessionContext,
        target: &AssignmentTarget,
        permissions: Vec<PermissionRecord>,
    ) -> AppResult<Vec<PermissionRecord>> {
        let submitted = dedup_by_resource(permissions);

        self.repository
            .save_permissions(session, target, submitted.as_slice())
            .await?;

        info!(
            user_id = %session.user_id(),
            target = %target,
            resource_count = submitted.len(),
            "permission assignment saved"
        );

        Ok(submitted)
    }
}
