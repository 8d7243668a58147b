use async_trait::async_trait;
use warden_errors::AppResult;

use crate::auth::domain::entities::OnlineSession;
use crate::shared::domain::value_objects::TokenTimeout;

/// Live sessions, namespaced per tenant.
///
/// `put` writes under `session.tenant_id`. `get` and `remove` act on the tenant
/// of the enclosing `with_tenant` scope, so a lookup can never reach another
/// tenant's entry.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// `TokenTimeout::Never` stores without expiry.
    async fn put(&self, session: &OnlineSession, ttl: TokenTimeout) -> AppResult<()>;

    /// `None` outside a tenant scope.
    async fn get(&self, token: &str) -> AppResult<Option<OnlineSession>>;

    /// Idempotent. Fails with `AppError::FailedPrecondition` outside a tenant scope.
    async fn remove(&self, token: &str) -> AppResult<()>;
}
