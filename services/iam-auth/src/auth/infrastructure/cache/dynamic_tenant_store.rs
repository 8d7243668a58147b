//! Super-admin tenant override
//!
//! A platform administrator may act as another tenant for the rest of the
//! session. The override is global, keyed by user id, and cleared at logout.

use std::sync::Arc;

use tracing::info;
use warden_common::{TenantId, UserId};
use warden_errors::AppResult;
use warden_ports::CachePort;

use crate::auth::domain::cache_keys;

pub struct DynamicTenantStore {
    cache: Arc<dyn CachePort>,
}

impl DynamicTenantStore {
    pub fn new(cache: Arc<dyn CachePort>) -> Self {
        Self { cache }
    }

    pub async fn set(&self, user_id: UserId, tenant: &TenantId) -> AppResult<()> {
        self.cache
            .set(&cache_keys::dynamic_tenant(user_id), tenant.as_str(), None)
            .await?;
        info!(user_id = %user_id, tenant_id = %tenant, "Dynamic tenant set");
        Ok(())
    }

    pub async fn get(&self, user_id: UserId) -> AppResult<Option<TenantId>> {
        Ok(self
            .cache
            .get(&cache_keys::dynamic_tenant(user_id))
            .await?
            .map(TenantId::new))
    }

    pub async fn clear(&self, user_id: UserId) -> AppResult<()> {
        self.cache.delete(&cache_keys::dynamic_tenant(user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_adapter_memory::MemoryCache;

    #[tokio::test]
    async fn test_set_get_clear() {
        let store = DynamicTenantStore::new(Arc::new(MemoryCache::new()));
        assert_eq!(store.get(UserId(1)).await.unwrap(), None);

        store.set(UserId(1), &TenantId::from("t9")).await.unwrap();
        assert_eq!(store.get(UserId(1)).await.unwrap(), Some(TenantId::from("t9")));

        store.clear(UserId(1)).await.unwrap();
        assert_eq!(store.get(UserId(1)).await.unwrap(), None);
    }
}
