use propvest_domain::{ConsoleSection, EffectivePermissionSet, PermissionCheck, Role};

/// Snapshot of the session's permission state answering allow/deny questions.
///
/// Every check fails closed until a permission set has been loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PermissionResolver {
    /// No fetch has completed yet.
    #[default]
    Pending,
    /// Permissions were fetched successfully.
    Loaded(EffectivePermissionSet),
    /// The last fetch failed with the captured message.
    Failed(String),
}

impl PermissionResolver {
    /// Returns whether the user may perform `action` on `resource`.
    #[must_use]
    pub fn has_permission(&self, resource: &str, action: &str) -> bool {
        match self {
            Self::Loaded(permissions) => permissions.allows(resource, action),
            Self::Pending | Self::Failed(_) => false,
        }
    }

    /// Returns whether at least one of the checks passes.
    #[must_use]
    pub fn has_any_permission<I>(&self, checks: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<PermissionCheck>,
    {
        checks.into_iter().map(Into::into).any(|check| {
            self.has_permission(check.resource.as_str(), check.action.as_str())
        })
    }

    /// Returns whether every check passes.
    ///
    /// An empty list passes only once permissions are loaded.
    #[must_use]
    pub fn has_all_permissions<I>(&self, checks: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<PermissionCheck>,
    {
        self.is_loaded()
            && checks.into_iter().map(Into::into).all(|check| {
                self.has_permission(check.resource.as_str(), check.action.as_str())
            })
    }

    /// Returns the loaded role, if any.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.permissions().map(EffectivePermissionSet::role)
    }

    /// Returns whether the loaded role ranks at or above `role`.
    #[must_use]
    pub fn has_role_at_least(&self, role: Role) -> bool {
        self.role().is_some_and(|current| current.is_at_least(role))
    }

    /// Returns the loaded permission set, if any.
    #[must_use]
    pub fn permissions(&self) -> Option<&EffectivePermissionSet> {
        match self {
            Self::Loaded(permissions) => Some(permissions),
            Self::Pending | Self::Failed(_) => None,
        }
    }

    /// Returns the fetch failure message, if the last fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            Self::Pending | Self::Loaded(_) => None,
        }
    }

    /// Returns whether a permission set is loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Returns the console sections the user may open.
    #[must_use]
    pub fn accessible_sections(&self) -> Vec<ConsoleSection> {
        ConsoleSection::all()
            .iter()
            .copied()
            .filter(|section| self.has_any_permission(section.required_checks().iter().copied()))
            .collect()
    }
}
