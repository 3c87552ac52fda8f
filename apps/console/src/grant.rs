use std::sync::Arc;

use propvest_application::{AssignmentTarget, PermissionResolver, PermissionSetEditor};
use propvest_core::{AppError, AppResult};
use propvest_domain::{PermissionCatalog, PermissionCheck, PermissionRecord, action};
use tracing::{debug, info};

/// Resource whose `manage` grant allows replacing the target's permissions.
fn managing_resource(target: &AssignmentTarget) -> &'static str {
    match target {
        AssignmentTarget::Group(_) => "groups",
        AssignmentTarget::User(_) => "users",
    }
}

/// Fails with `Forbidden` unless the session may manage the target's grants.
pub fn ensure_may_assign(
    resolver: &PermissionResolver,
    target: &AssignmentTarget,
) -> AppResult<()> {
    let resource = managing_resource(target);
    if resolver.has_any_permission([(resource, action::MANAGE)]) {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "session may not manage permissions of {target} (requires {resource}:{})",
        action::MANAGE
    )))
}

/// Builds the selection for `grants` through the permission editor.
pub fn build_grants(
    catalog: Arc<PermissionCatalog>,
    grants: Vec<PermissionCheck>,
) -> AppResult<Vec<PermissionRecord>> {
    let mut editor = PermissionSetEditor::new(catalog, Vec::new()).with_observer(
        |permissions: &[PermissionRecord]| {
            debug!(resource_count = permissions.len(), "permission selection changed");
        },
    );

    for grant in grants {
        let resource = grant.resource.as_str();
        let action = grant.action.as_str();

        let included = editor
            .permissions()
            .iter()
            .find(|record| record.resource() == resource);
        let already_granted = included.is_some_and(|record| record.allows(action));

        if included.is_none() && !editor.add_resource(resource) {
            return Err(AppError::Validation(format!(
                "resource '{resource}' is not in the permission catalog"
            )));
        }

        if !already_granted && !editor.toggle_action(resource, action) {
            return Err(AppError::Validation(format!(
                "action '{action}' is not offered for resource '{resource}'"
            )));
        }
    }

    let summary = editor.summary();
    info!(
        resource_count = summary.resource_count,
        action_count = summary.action_count,
        "permission selection built"
    );

    Ok(editor.into_permissions())
}
