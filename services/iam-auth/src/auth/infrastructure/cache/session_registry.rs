//! Online-session registry on top of the shared cache

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use warden_common::current_tenant;
use warden_errors::{AppError, AppResult};
use warden_ports::{CacheExt, CachePort};

use crate::auth::domain::cache_keys;
use crate::auth::domain::entities::OnlineSession;
use crate::auth::domain::repositories::SessionRegistry;
use crate::shared::domain::value_objects::TokenTimeout;

pub struct CacheSessionRegistry {
    cache: Arc<dyn CachePort>,
}

impl CacheSessionRegistry {
    pub fn new(cache: Arc<dyn CachePort>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl SessionRegistry for CacheSessionRegistry {
    async fn put(&self, session: &OnlineSession, ttl: TokenTimeout) -> AppResult<()> {
        let key = cache_keys::online_session(&session.tenant_id, &session.token_id);
        self.cache.set_json(&key, session, ttl.as_duration()).await?;
        debug!(key = %key, ttl = ttl.as_secs(), "Online session stored");
        Ok(())
    }

    async fn get(&self, token: &str) -> AppResult<Option<OnlineSession>> {
        let Some(tenant) = current_tenant() else {
            return Ok(None);
        };
        self.cache
            .get_json(&cache_keys::online_session(&tenant, token))
            .await
    }

    async fn remove(&self, token: &str) -> AppResult<()> {
        let tenant = current_tenant().ok_or_else(|| {
            AppError::failed_precondition("Removing an online session requires a tenant scope")
        })?;
        let key = cache_keys::online_session(&tenant, token);
        self.cache.delete(&key).await?;
        debug!(key = %key, "Online session removed");
        Ok(())
    }
}
