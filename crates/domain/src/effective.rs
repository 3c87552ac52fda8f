use serde::Serialize;

use crate::permission::{PermissionRecord, dedup_by_resource};
use crate::role::Role;

/// Merged grants of one user, together with their role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectivePermissionSet {
    user_id: String,
    user_name: String,
    email: Option<String>,
    role: Role,
    effective_permissions: Vec<PermissionRecord>,
}

impl EffectivePermissionSet {
    /// Creates an effective set; repeated resources keep their first record.
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        email: Option<String>,
        role: Role,
        effective_permissions: impl IntoIterator<Item = PermissionRecord>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            email,
            role,
            effective_permissions: dedup_by_resource(effective_permissions),
        }
    }

    /// Returns the user id.
    #[must_use]
    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn user_name(&self) -> &str {
        self.user_name.as_str()
    }

    /// Returns the email, if the service returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the user's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns granted records in insertion order.
    #[must_use]
    pub fn permissions(&self) -> &[PermissionRecord] {
        self.effective_permissions.as_slice()
    }

    /// Finds the record granted for a resource.
    #[must_use]
    pub fn permission(&self, resource: &str) -> Option<&PermissionRecord> {
        self.effective_permissions
            .iter()
            .find(|record| record.resource() == resource)
    }

    /// Returns whether the user may perform `action` on `resource`.
    ///
    /// Super admins are allowed everything, including unknown resources.
    #[must_use]
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        if self.role.is_super_admin() {
            return true;
        }

        self.permission(resource)
            .is_some_and(|record| record.allows(action))
    }
}

#[cfg(test)]
mod tests {
    use super::EffectivePermissionSet;
    use crate::permission::{PermissionRecord, action};
    use crate::role::Role;

    fn team_member(records: Vec<PermissionRecord>) -> EffectivePermissionSet {
        EffectivePermissionSet::new("u-7", "Dana", None, Role::TeamMember, records)
    }

    #[test]
    fn allows_granted_action_only() {
        let set = team_member(vec![PermissionRecord::new(
            "properties",
            [action::VIEW, action::EDIT],
        )]);

        assert!(set.allows("properties", action::EDIT));
        assert!(!set.allows("properties", action::DELETE));
        assert!(!set.allows("investors", action::VIEW));
    }

    #[test]
    fn first_group_grant_wins() {
        let set = team_member(vec![
            PermissionRecord::new("kyc", [action::VIEW]),
            PermissionRecord::new("kyc", [action::VIEW, action::VERIFY]),
        ]);

        assert_eq!(set.permissions().len(), 1);
        assert!(!set.allows("kyc", action::VERIFY));
    }

    #[test]
    fn super_admin_bypasses_missing_records() {
        let set = EffectivePermissionSet::new("u-1", "Root", None, Role::SuperAdmin, Vec::new());

        assert!(set.allows("anything", "at-all"));
    }
}
