//! Propvest console permission tool.
//!
//! Loads the signed-in administrator's effective permissions and reports what
//! the console would show them, or edits a group's or user's grants.

#![forbid(unsafe_code)]

mod command;
mod console_config;
mod grant;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use propvest_application::{
    AssignmentTarget, EffectivePermissionService, PermissionAssignmentService,
    PermissionCatalogSource, PermissionLoadOutcome, PermissionResolver,
};
use propvest_core::{AppError, AppResult, SessionContext};
use propvest_domain::{PermissionCatalog, PermissionCheck, PermissionRecord};
use propvest_infrastructure::HttpAuthorizationClient;
use tracing::{info, warn};

use crate::command::ConsoleCommand;
use crate::console_config::{ConsoleConfig, init_tracing};
use crate::grant::{build_grants, ensure_may_assign};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let command = ConsoleCommand::parse(env::args().skip(1))?;
    let config = ConsoleConfig::load()?;
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.http_timeout_ms))
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let client = Arc::new(HttpAuthorizationClient::new(
        http_client,
        config.api_base_url.as_str(),
    )?);

    let session = SessionContext::new(config.session_token.as_str(), config.user_id.as_str())?;
    let permission_service = EffectivePermissionService::new(client.clone());

    info!(
        api_base_url = %config.api_base_url,
        user_id = %session.user_id(),
        "propvest-console started"
    );

    let result = match permission_service.refresh(&session).await {
        PermissionLoadOutcome::Loaded => {
            let resolver = permission_service.resolver();
            match command {
                ConsoleCommand::Sections => {
                    print_sections(&resolver);
                    Ok(())
                }
                ConsoleCommand::Check(checks) => {
                    print_checks(&resolver, checks);
                    Ok(())
                }
                ConsoleCommand::Grant { target, grants } => {
                    run_grant(client, &session, &resolver, &target, grants).await
                }
            }
        }
        PermissionLoadOutcome::Failed | PermissionLoadOutcome::Discarded => {
            Err(AppError::Internal(permission_service.error().unwrap_or_else(
                || "failed to load permissions".to_owned(),
            )))
        }
    };

    permission_service.clear();
    result
}

async fn run_grant(
    client: Arc<HttpAuthorizationClient>,
    session: &SessionContext,
    resolver: &PermissionResolver,
    target: &AssignmentTarget,
    grants: Vec<PermissionCheck>,
) -> AppResult<()> {
    ensure_may_assign(resolver, target)?;
    let catalog = load_catalog(client.as_ref(), session).await;
    let permissions = build_grants(catalog, grants)?;
    let submitted = PermissionAssignmentService::new(client)
        .submit(session, target, permissions)
        .await?;

    print_submitted(target, &submitted);
    Ok(())
}

async fn load_catalog(
    source: &dyn PermissionCatalogSource,
    session: &SessionContext,
) -> Arc<PermissionCatalog> {
    match source.fetch_catalog(session).await {
        Ok(catalog) if !catalog.is_empty() => Arc::new(catalog),
        Ok(_) => {
            warn!("authorization service returned an empty catalog, using built-in catalog");
            Arc::new(PermissionCatalog::standard())
        }
        Err(error) => {
            warn!(error = %error, "failed to load permission catalog, using built-in catalog");
            Arc::new(PermissionCatalog::standard())
        }
    }
}

fn print_sections(resolver: &PermissionResolver) {
    if let Some(permissions) = resolver.permissions() {
        println!(
            "{} ({}) role={}",
            permissions.user_name(),
            permissions.user_id(),
            permissions.role()
        );
    }

    for section in resolver.accessible_sections() {
        println!("  {}", section.as_str());
    }
}

fn print_checks(resolver: &PermissionResolver, checks: Vec<PermissionCheck>) {
    for check in &checks {
        let verdict = if resolver.has_permission(check.resource.as_str(), check.action.as_str()) {
            "allow"
        } else {
            "deny"
        };
        println!("{}:{} {verdict}", check.resource, check.action);
    }

    println!("any={}", resolver.has_any_permission(checks.iter().cloned()));
    println!("all={}", resolver.has_all_permissions(checks));
}

fn print_submitted(target: &AssignmentTarget, submitted: &[PermissionRecord]) {
    println!("saved {} resources for {target}", submitted.len());
    for record in submitted {
        let actions: Vec<&str> = record.actions().iter().map(String::as_str).collect();
        println!("  {} [{}]", record.resource(), actions.join(", "));
    }
}
