use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use propvest_core::SessionContext;
use propvest_domain::PermissionCheck;
use tracing::{debug, info, warn};

use crate::{EffectivePermissionSource, PermissionResolver};

/// Result of one permission refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionLoadOutcome {
    /// The fetched set replaced the previous snapshot.
    Loaded,
    /// The fetch failed; checks deny until a later refresh succeeds.
    Failed,
    /// A newer refresh or a sign-out superseded this one; its response was dropped.
    Discarded,
}

/// Application service keeping the session's freshest permission snapshot.
///
/// Every refresh takes a ticket; a response is applied only while its ticket
/// is still the newest one issued.
pub struct EffectivePermissionService {
    source: Arc<dyn EffectivePermissionSource>,
    current: RwLock<Arc<PermissionResolver>>,
    latest_ticket: AtomicU64,
}

impl EffectivePermissionService {
    /// Creates a service in the pending state.
    #[must_use]
    pub fn new(source: Arc<dyn EffectivePermissionSource>) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(PermissionResolver::Pending)),
            latest_ticket: AtomicU64::new(0),
        }
    }

    /// Fetches the session's effective permissions and publishes them.
    ///
    /// Failures are retained as resolver state rather than returned.
    pub async fn refresh(&self, session: &SessionContext) -> PermissionLoadOutcome {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(ticket, user_id = %session.user_id(), "fetching effective permissions");

        let (next, outcome) = match self.source.fetch_effective_permissions(session).await {
            Ok(permissions) => {
                info!(
                    ticket,
                    user_id = %permissions.user_id(),
                    role = %permissions.role(),
                    resource_count = permissions.permissions().len(),
                    "effective permissions loaded"
                );
                (
                    PermissionResolver::Loaded(permissions),
                    PermissionLoadOutcome::Loaded,
                )
            }
            Err(error) => {
                warn!(
                    ticket,
                    user_id = %session.user_id(),
                    error = %error,
                    "failed to load effective permissions"
                );
                (
                    PermissionResolver::Failed(error.to_string()),
                    PermissionLoadOutcome::Failed,
                )
            }
        };

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if self.latest_ticket.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "discarding stale permission response");
            return PermissionLoadOutcome::Discarded;
        }

        *current = Arc::new(next);
        outcome
    }

    /// Drops the loaded permissions on sign-out and invalidates in-flight fetches.
    pub fn clear(&self) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        self.latest_ticket.fetch_add(1, Ordering::SeqCst);
        *current = Arc::new(PermissionResolver::Pending);
        debug!("effective permissions cleared");
    }

    /// Returns the freshest resolver snapshot.
    #[must_use]
    pub fn resolver(&self) -> Arc<PermissionResolver> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns whether the user may perform `action` on `resource`.
    #[must_use]
    pub fn has_permission(&self, resource: &str, action: &str) -> bool {
        self.resolver().has_permission(resource, action)
    }

    /// Returns whether at least one of the checks passes.
    #[must_use]
    pub fn has_any_permission<I>(&self, checks: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<PermissionCheck>,
    {
        self.resolver().has_any_permission(checks)
    }

    /// Returns whether every check passes.
    #[must_use]
    pub fn has_all_permissions<I>(&self, checks: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<PermissionCheck>,
    {
        self.resolver().has_all_permissions(checks)
    }

    /// Returns the message of the last failed fetch, if any.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.resolver().error().map(str::to_owned)
    }
}
