use propvest_application::{
    AssignmentTarget, EffectivePermissionSource, PermissionAssignmentRepository,
    PermissionCatalogSource,
};
use propvest_core::{AppError, SessionContext};
use propvest_domain::{PermissionRecord, Role, action};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::HttpAuthorizationClient;

fn session() -> SessionContext {
    SessionContext::new("session-token", "u-5").unwrap_or_else(|_| unreachable!())
}

fn client(server: &MockServer) -> HttpAuthorizationClient {
    HttpAuthorizationClient::new(reqwest::Client::new(), server.uri().as_str())
        .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn fetches_effective_permissions_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/permissions/me"))
        .and(header("authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "userId": "u-5",
                "userName": "Riley",
                "email": "riley@example.com",
                "role": "team_lead",
                "effectivePermissions": [
                    { "resource": "properties", "actions": ["view", "edit"] },
                    { "resource": "properties", "actions": ["delete"] }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let permissions = client(&server).fetch_effective_permissions(&session()).await;

    assert!(permissions.is_ok());
    let permissions = permissions.unwrap_or_else(|_| unreachable!());
    assert_eq!(permissions.role(), Role::TeamLead);
    assert_eq!(permissions.email(), Some("riley@example.com"));
    assert!(permissions.allows("properties", action::EDIT));
    assert!(!permissions.allows("properties", action::DELETE));
}

#[tokio::test]
async fn missing_effective_permissions_yield_empty_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/permissions/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "role": "admin" })))
        .mount(&server)
        .await;

    let permissions = client(&server).fetch_effective_permissions(&session()).await;

    assert!(permissions.is_ok_and(|permissions| {
        permissions.permissions().is_empty() && permissions.role() == Role::Admin
    }));
}

#[tokio::test]
async fn unauthorized_status_maps_to_unauthorized_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/permissions/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let result = client(&server).fetch_effective_permissions(&session()).await;

    assert!(matches!(
        result,
        Err(AppError::Unauthorized(message)) if message.contains("token expired")
    ));
}

#[tokio::test]
async fn invalid_json_is_an_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/permissions/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let result = client(&server).fetch_effective_permissions(&session()).await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn fetches_catalog_from_object_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/permissions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "permissions": [
                { "resource": "kyc:approval", "actions": ["view", "approve", "reject"] },
                { "resource": "reports", "actions": ["view", "export"] }
            ]
        })))
        .mount(&server)
        .await;

    let catalog = client(&server).fetch_catalog(&session()).await;

    assert!(catalog.is_ok_and(|catalog| {
        catalog.len() == 2
            && catalog
                .offered_actions("kyc:approval")
                .is_some_and(|actions| actions.contains(action::APPROVE))
    }));
}

#[tokio::test]
async fn saves_group_permissions_with_encoded_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/groups/ops%2Fnorth/permissions"))
        .and(header("authorization", "Bearer session-token"))
        .and(body_json(json!({
            "permissions": [{ "resource": "kyc", "actions": ["verify", "view"] }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let target = AssignmentTarget::group("ops/north").unwrap_or_else(|_| unreachable!());

    let result = client(&server)
        .save_permissions(
            &session(),
            &target,
            &[PermissionRecord::new("kyc", [action::VIEW, action::VERIFY])],
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn forbidden_save_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/u-9/permissions"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let target = AssignmentTarget::user("u-9").unwrap_or_else(|_| unreachable!());

    let result = client(&server)
        .save_permissions(&session(), &target, &[])
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn connection_failure_is_an_internal_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|address| address.port())
        .unwrap_or_else(|_| unreachable!());
    let client = HttpAuthorizationClient::new(
        reqwest::Client::new(),
        format!("http://127.0.0.1:{port}").as_str(),
    )
    .unwrap_or_else(|_| unreachable!());

    let result = client.fetch_effective_permissions(&session()).await;

    assert!(matches!(
        result,
        Err(AppError::Internal(message)) if message.contains("failed to call endpoint")
    ));
}

#[tokio::test]
async fn top_level_grants_are_kept_beside_a_data_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/permissions/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "role": "admin",
            "effectivePermissions": [{ "resource": "kyc", "actions": ["view"] }],
            "data": {}
        })))
        .mount(&server)
        .await;

    let permissions = client(&server).fetch_effective_permissions(&session()).await;

    assert!(permissions.is_ok_and(|permissions| {
        permissions.role() == Role::Admin && permissions.allows("kyc", action::VIEW)
    }));
}

#[test]
fn rejects_invalid_base_url() {
    let result = HttpAuthorizationClient::new(reqwest::Client::new(), "not a url");
    assert!(matches!(result, Err(AppError::Validation(_))));
}
