//! Task-local tenant context
//!
//! The current tenant is carried as a task-local value instead of a process global,
//! so concurrent requests acting as different tenants never observe each other.
//! `with_tenant` scopes a future to a tenant and restores the outer value when the
//! future completes, returns an error or is dropped.

use std::future::Future;

use crate::types::TenantId;

tokio::task_local! {
    static CURRENT_TENANT: TenantId;
}

/// Tenant of the enclosing `with_tenant` scope, if any.
pub fn current_tenant() -> Option<TenantId> {
    CURRENT_TENANT.try_with(|tenant| tenant.clone()).ok()
}

/// Run `fut` acting as `tenant`.
pub async fn with_tenant<F>(tenant: TenantId, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_TENANT.scope(tenant, fut).await
}
