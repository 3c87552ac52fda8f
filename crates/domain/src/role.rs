use std::fmt::{Display, Formatter};
use std::str::FromStr;

use propvest_core::AppError;
use serde::{Deserialize, Serialize};

/// Coarse-grained identity tier of a console user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Bypasses every fine-grained permission check.
    SuperAdmin,
    /// Platform administrator.
    Admin,
    /// Leads a team of operators.
    TeamLead,
    /// Operator inside a team.
    TeamMember,
    /// Least privileged console user.
    User,
}

impl Role {
    /// Returns a stable transport value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::TeamLead => "team_lead",
            Self::TeamMember => "team_member",
            Self::User => "user",
        }
    }

    /// Returns all known roles, least privileged first.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::User,
            Role::TeamMember,
            Role::TeamLead,
            Role::Admin,
            Role::SuperAdmin,
        ];

        ALL
    }

    /// Returns whether this role bypasses permission checks.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Returns whether this role ranks at or above `other`.
    #[must_use]
    pub fn is_at_least(&self, other: Role) -> bool {
        self.rank() >= other.rank()
    }

    /// Parses a transport value, falling back to [`Role::User`] for unknown values.
    #[must_use]
    pub fn from_transport_lenient(value: &str) -> Self {
        Self::from_str(value).unwrap_or(Self::User)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::User => 0,
            Self::TeamMember => 1,
            Self::TeamLead => 2,
            Self::Admin => 3,
            Self::SuperAdmin => 4,
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "team_lead" => Ok(Self::TeamLead),
            "team_member" => Ok(Self::TeamMember),
            "user" => Ok(Self::User),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Role;

    #[test]
    fn role_roundtrip_transport_value() {
        for role in Role::all() {
            let restored = Role::from_str(role.as_str());
            assert_eq!(restored.ok(), Some(*role));
        }
    }

    #[test]
    fn unknown_role_falls_back_to_least_privilege() {
        assert!(Role::from_str("owner").is_err());
        assert_eq!(Role::from_transport_lenient("owner"), Role::User);
    }

    #[test]
    fn role_ranking_is_ordered() {
        assert!(Role::SuperAdmin.is_at_least(Role::Admin));
        assert!(Role::TeamLead.is_at_least(Role::TeamLead));
        assert!(!Role::TeamMember.is_at_least(Role::TeamLead));
    }

    #[test]
    fn role_serializes_as_snake_case() {
        let rendered = serde_json::to_string(&Role::TeamLead).unwrap_or_default();
        assert_eq!(rendered, "\"team_lead\"");
    }
}
