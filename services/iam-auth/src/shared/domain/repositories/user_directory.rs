use async_trait::async_trait;
use chrono::{DateTime, Utc};
use warden_common::{TenantId, UserId};
use warden_errors::AppResult;

use crate::shared::domain::entities::{NewUser, UserRecord};

/// User lookups are always scoped to one tenant.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(
        &self,
        tenant_id: &TenantId,
        username: &str,
    ) -> AppResult<Option<UserRecord>>;

    async fn find_by_phonenumber(
        &self,
        tenant_id: &TenantId,
        phonenumber: &str,
    ) -> AppResult<Option<UserRecord>>;

    async fn find_by_email(&self, tenant_id: &TenantId, email: &str)
    -> AppResult<Option<UserRecord>>;

    async fn exists_username(&self, tenant_id: &TenantId, username: &str) -> AppResult<bool>;

    async fn register(&self, user: NewUser) -> AppResult<UserId>;

    async fn update_last_login(
        &self,
        user_id: UserId,
        ip: &str,
        at: DateTime<Utc>,
    ) -> AppResult<()>;
}
