use std::fmt::{Display, Formatter};

use async_trait::async_trait;

use propvest_core::{AppResult, NonEmptyString, SessionContext};
use propvest_domain::{EffectivePermissionSet, PermissionCatalog, PermissionRecord};

/// Port for reading the signed-in user's effective permissions.
#[async_trait]
pub trait EffectivePermissionSource: Send + Sync {
    /// Fetches the role and merged grants of the session's user.
    async fn fetch_effective_permissions(
        &self,
        session: &SessionContext,
    ) -> AppResult<EffectivePermissionSet>;
}

/// Port for reading the catalog of every known resource.
#[async_trait]
pub trait PermissionCatalogSource: Send + Sync {
    /// Fetches the catalog of resources and their maximum action sets.
    async fn fetch_catalog(&self, session: &SessionContext) -> AppResult<PermissionCatalog>;
}

/// Owner of an edited permission set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentTarget {
    /// Permissions shared by every member of a group.
    Group(NonEmptyString),
    /// Permissions assigned directly to a user.
    User(NonEmptyString),
}

impl AssignmentTarget {
    /// Targets a group by id.
    pub fn group(group_id: impl Into<String>) -> AppResult<Self> {
        Ok(Self::Group(NonEmptyString::new(group_id)?))
    }

    /// Targets a user by id.
    pub fn user(user_id: impl Into<String>) -> AppResult<Self> {
        Ok(Self::User(NonEmptyString::new(user_id)?))
    }

    /// Returns the target id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Group(id) | Self::User(id) => id.as_str(),
        }
    }

    /// Returns a stable kind label.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Group(_) => "group",
            Self::User(_) => "user",
        }
    }
}

impl Display for AssignmentTarget {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}:{}", self.kind(), self.id())
    }
}

/// Repository port persisting edited permission sets.
#[async_trait]
pub trait PermissionAssignmentRepository: Send + Sync {
    /// Replaces the permissions assigned to the target.
    async fn save_permissions(
        &self,
        session: &SessionContext,
        target: &AssignmentTarget,
        permissions: &[PermissionRecord],
    ) -> AppResult<()>;
}
