use async_trait::async_trait;
use warden_common::TenantId;
use warden_errors::AppResult;

use crate::shared::domain::entities::TenantRecord;

#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn find_by_tenant_id(&self, tenant_id: &TenantId) -> AppResult<Option<TenantRecord>>;
}
