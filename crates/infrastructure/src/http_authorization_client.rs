use async_trait::async_trait;
use propvest_application::{
    AssignmentTarget, EffectivePermissionSource, PermissionAssignmentRepository,
    PermissionCatalogSource,
};
use propvest_core::{AppError, AppResult, SessionContext};
use propvest_domain::{EffectivePermissionSet, PermissionCatalog, PermissionRecord};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

mod wire;

use wire::{CatalogResponse, EffectivePermissionsResponse, SavePermissionsRequest};

/// HTTP client for the remote authorization service.
pub struct HttpAuthorizationClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpAuthorizationClient {
    /// Creates a client rooted at the service base URL.
    pub fn new(http_client: reqwest::Client, base_url: &str) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!(
                "invalid authorization service URL '{base_url}': {error}"
            ))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "authorization service URL '{base_url}' cannot be used as a base"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "authorization service URL '{}' cannot be used as a base",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn get_json<T>(&self, session: &SessionContext, segments: &[&str]) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let endpoint = self.endpoint(segments)?;
        debug!(endpoint = %endpoint, "calling authorization service");

        let response = self
            .http_client
            .get(endpoint.clone())
            .bearer_auth(session.access_token())
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to call endpoint '{endpoint}': {error}"))
            })?;
        let response = ensure_success(response, &endpoint).await?;

        response.json::<T>().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to parse response body from '{endpoint}': {error}"
            ))
        })
    }
}

async fn ensure_success(
    response: reqwest::Response,
    endpoint: &Url,
) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<body unavailable>".to_owned());
    let message = format!(
        "endpoint '{endpoint}' returned status {}: {body}",
        status.as_u16()
    );

    Err(match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Internal(message),
    })
}

#[async_trait]
impl EffectivePermissionSource for HttpAuthorizationClient {
    async fn fetch_effective_permissions(
        &self,
        session: &SessionContext,
    ) -> AppResult<EffectivePermissionSet> {
        let response: EffectivePermissionsResponse = self
            .get_json(session, &["api", "auth", "permissions", "me"])
            .await?;

        Ok(response.into_payload().into_effective_set(session))
    }
}

#[async_trait]
impl PermissionCatalogSource for HttpAuthorizationClient {
    async fn fetch_catalog(&self, session: &SessionContext) -> AppResult<PermissionCatalog> {
        let response: CatalogResponse = self.get_json(session, &["api", "permissions"]).await?;

        Ok(response.into_catalog())
    }
}

#[async_trait]
impl PermissionAssignmentRepository for HttpAuthorizationClient {
    async fn save_permissions(
        &self,
        session: &SessionContext,
        target: &AssignmentTarget,
        permissions: &[PermissionRecord],
    ) -> AppResult<()> {
        let collection = match target {
            AssignmentTarget::Group(_) => "groups",
            AssignmentTarget::User(_) => "users",
        };
        let endpoint = self.endpoint(&["api", collection, target.id(), "permissions"])?;
        debug!(endpoint = %endpoint, target = %target, "saving permission assignment");

        let response = self
            .http_client
            .put(endpoint.clone())
            .bearer_auth(session.access_token())
            .json(&SavePermissionsRequest { permissions })
            .send()
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to call endpoint '{endpoint}': {error}"))
            })?;
        ensure_success(response, &endpoint).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests;
