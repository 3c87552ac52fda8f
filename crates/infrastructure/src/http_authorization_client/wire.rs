//! Wire shapes of the authorization service and their normalization.
//!
//! Every field is optional on the wire. Payloads may arrive bare or inside a
//! `{ "data": ... }` envelope, and catalogs may be an array or an object with
//! a `permissions` array. All shape handling happens here so the rest of the
//! workspace only sees domain types.
//!
//! Top-level fields win over `data`: the envelope is only unwrapped when the
//! top level carries none of the payload's own fields.

use propvest_core::SessionContext;
use propvest_domain::{EffectivePermissionSet, PermissionCatalog, PermissionRecord, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(super) struct PermissionRecordPayload {
    #[serde(default)]
    resource: Option<String>,
    #[serde(default)]
    actions: Option<Vec<String>>,
}

impl PermissionRecordPayload {
    fn into_record(self) -> Option<PermissionRecord> {
        let resource = self.resource.filter(|value| !value.trim().is_empty())?;
        Some(PermissionRecord::new(
            resource,
            self.actions.unwrap_or_default(),
        ))
    }
}

fn into_records(payloads: Option<Vec<PermissionRecordPayload>>) -> Vec<PermissionRecord> {
    payloads
        .unwrap_or_default()
        .into_iter()
        .filter_map(PermissionRecordPayload::into_record)
        .collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct EffectivePermissionsPayload {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    effective_permissions: Option<Vec<PermissionRecordPayload>>,
}

impl EffectivePermissionsPayload {
    fn carries_grants(&self) -> bool {
        self.role.is_some() || self.effective_permissions.is_some()
    }

    pub(super) fn into_effective_set(self, session: &SessionContext) -> EffectivePermissionSet {
        let role = self
            .role
            .as_deref()
            .map(Role::from_transport_lenient)
            .unwrap_or(Role::User);

        EffectivePermissionSet::new(
            self.user_id
                .unwrap_or_else(|| session.user_id().to_owned()),
            self.user_name.unwrap_or_default(),
            self.email.filter(|value| !value.trim().is_empty()),
            role,
            into_records(self.effective_permissions),
        )
    }
}

/// Body of the effective permissions endpoint, bare or enveloped.
#[derive(Debug, Deserialize)]
pub(super) struct EffectivePermissionsResponse {
    #[serde(default)]
    data: Option<EffectivePermissionsPayload>,
    #[serde(flatten)]
    top_level: EffectivePermissionsPayload,
}

impl EffectivePermissionsResponse {
    pub(super) fn into_payload(self) -> EffectivePermissionsPayload {
        if self.top_level.carries_grants() {
            return self.top_level;
        }

        self.data.unwrap_or(self.top_level)
    }
}

/// Body of the catalog endpoint: an array, an object with `permissions`, or
/// either of those inside `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum CatalogResponse {
    Records(Vec<PermissionRecordPayload>),
    Object {
        #[serde(default)]
        permissions: Option<Vec<PermissionRecordPayload>>,
        #[serde(default)]
        data: Option<Box<CatalogResponse>>,
    },
}

impl CatalogResponse {
    fn into_payloads(self) -> Option<Vec<PermissionRecordPayload>> {
        match self {
            Self::Records(records) => Some(records),
            Self::Object {
                permissions: Some(permissions),
                ..
            } => Some(permissions),
            Self::Object {
                permissions: None,
                data,
            } => data.and_then(|data| data.into_payloads()),
        }
    }

    pub(super) fn into_catalog(self) -> PermissionCatalog {
        PermissionCatalog::new(into_records(self.into_payloads()))
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SavePermissionsRequest<'a> {
    pub(super) permissions: &'a [PermissionRecord],
}

#[cfg(test)]
mod tests {
    use propvest_core::SessionContext;
    use propvest_domain::{Role, action};

    use super::{CatalogResponse, EffectivePermissionsPayload, EffectivePermissionsResponse};

    fn session() -> SessionContext {
        SessionContext::new("token", "session-user").unwrap_or_else(|_| unreachable!())
    }

    fn parse_effective(body: &str) -> Option<EffectivePermissionsPayload> {
        serde_json::from_str::<EffectivePermissionsResponse>(body)
            .ok()
            .map(EffectivePermissionsResponse::into_payload)
    }

    #[test]
    fn wrapped_and_bare_payloads_normalize_identically() {
        let bare = r#"{ "userId": "u-1", "role": "admin",
            "effectivePermissions": [{ "resource": "kyc", "actions": ["view"] }] }"#;
        let wrapped = format!(r#"{{ "success": true, "data": {bare} }}"#);

        let bare = parse_effective(bare).map(|payload| payload.into_effective_set(&session()));
        let wrapped = parse_effective(wrapped.as_str())
            .map(|payload| payload.into_effective_set(&session()));

        assert!(bare.is_some());
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn missing_fields_become_least_privileged_empty_set() {
        let set = parse_effective("{}").map(|payload| payload.into_effective_set(&session()));

        assert!(set.as_ref().is_some_and(|set| set.permissions().is_empty()));
        assert_eq!(set.as_ref().map(|set| set.role()), Some(Role::User));
        assert_eq!(
            set.as_ref().map(|set| set.user_id().to_owned()),
            Some("session-user".to_owned())
        );
    }

    #[test]
    fn records_without_resource_are_skipped() {
        let set = parse_effective(
            r#"{ "role": "team_lead", "effectivePermissions": [
                { "actions": ["view"] },
                { "resource": "reports" },
                { "resource": "reports", "actions": ["export"] }
            ] }"#,
        )
        .map(|payload| payload.into_effective_set(&session()));

        let permissions = set
            .map(|set| set.permissions().to_vec())
            .unwrap_or_default();
        assert_eq!(permissions.len(), 1);
        assert!(permissions[0].is_empty());
    }

    #[test]
    fn catalog_accepts_array_object_and_envelope() {
        let bodies = [
            r#"[{ "resource": "users", "actions": ["view"] }]"#,
            r#"{ "permissions": [{ "resource": "users", "actions": ["view"] }] }"#,
            r#"{ "data": [{ "resource": "users", "actions": ["view"] }] }"#,
            r#"{ "data": { "permissions": [{ "resource": "users", "actions": ["view"] }] } }"#,
            r#"{ "permissions": [{ "resource": "users", "actions": ["view"] }], "data": {} }"#,
        ];

        for body in bodies {
            let catalog = serde_json::from_str::<CatalogResponse>(body)
                .map(CatalogResponse::into_catalog);
            assert!(
                catalog.is_ok_and(|catalog| catalog.contains("users")),
                "failed to normalize {body}"
            );
        }
    }

    #[test]
    fn top_level_grants_win_over_unrelated_data_field() {
        let set = parse_effective(
            r#"{ "role": "admin",
                "effectivePermissions": [{ "resource": "kyc", "actions": ["view"] }],
                "data": {} }"#,
        )
        .map(|payload| payload.into_effective_set(&session()));

        assert_eq!(set.as_ref().map(|set| set.role()), Some(Role::Admin));
        assert!(set.is_some_and(|set| set.allows("kyc", action::VIEW)));
    }

    #[test]
    fn envelope_is_unwrapped_when_top_level_has_no_grants() {
        let set = parse_effective(
            r#"{ "success": true, "message": "ok",
                "data": { "role": "team_member",
                    "effectivePermissions": [{ "resource": "reports", "actions": ["export"] }] } }"#,
        )
        .map(|payload| payload.into_effective_set(&session()));

        assert_eq!(set.as_ref().map(|set| set.role()), Some(Role::TeamMember));
        assert!(set.is_some_and(|set| set.allows("reports", action::EXPORT)));
    }
}
