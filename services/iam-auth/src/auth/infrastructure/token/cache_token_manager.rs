//! Opaque bearer tokens kept in the shared cache
//!
//! `global:auth_token:{token}` holds the token state and expires with the
//! token. `global:login_token:{login_id}:{device}` points at the newest token of
//! a login id on one device type and is used to replace it when concurrent
//! logins are disabled.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;
use warden_errors::{AppError, AppResult};
use warden_ports::{CacheExt, CachePort, KeyTtl};

use crate::auth::domain::cache_keys;
use crate::auth::domain::token::{
    IssuedToken, LifecycleEvent, LoginParameter, TokenContext, TokenExtras, TokenListener,
    TokenManager,
};
use crate::shared::domain::value_objects::{RequestMeta, TokenTimeout};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TokenRecord {
    login_id: String,
    device_type: String,
    timeout: TokenTimeout,
    extras: TokenExtras,
}

impl TokenRecord {
    fn context(&self, token: &str, request: Option<RequestMeta>) -> TokenContext {
        TokenContext {
            token: token.to_string(),
            login_id: self.login_id.clone(),
            extras: self.extras.clone(),
            timeout: self.timeout,
            expires_at: None,
            request,
        }
    }

    /// Context for an event that just wrote the token with a fresh TTL.
    fn written_context(
        &self,
        token: &str,
        written_at: Instant,
        request: Option<RequestMeta>,
    ) -> TokenContext {
        TokenContext {
            expires_at: self.timeout.as_duration().map(|ttl| written_at + ttl),
            ..self.context(token, request)
        }
    }
}

pub struct CacheTokenManager {
    cache: Arc<dyn CachePort>,
    listener: Arc<dyn TokenListener>,
    is_concurrent: bool,
}

impl CacheTokenManager {
    pub fn new(cache: Arc<dyn CachePort>, listener: Arc<dyn TokenListener>) -> Self {
        Self {
            cache,
            listener,
            is_concurrent: true,
        }
    }

    /// With `false`, a new login on the same device type replaces the previous token.
    pub fn with_concurrent(mut self, is_concurrent: bool) -> Self {
        self.is_concurrent = is_concurrent;
        self
    }

    fn new_token() -> String {
        Uuid::new_v4().simple().to_string()
    }

    async fn load(&self, token: &str) -> AppResult<Option<TokenRecord>> {
        self.cache.get_json(&cache_keys::access_token(token)).await
    }

    async fn load_valid(&self, token: &str) -> AppResult<TokenRecord> {
        self.load(token)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Token is invalid or has expired"))
    }

    /// Delete the token state, and the device index if it still points here.
    async fn invalidate(&self, token: &str, record: &TokenRecord) -> AppResult<()> {
        self.cache.delete(&cache_keys::access_token(token)).await?;

        let index = cache_keys::login_token(&record.login_id, &record.device_type);
        if self.cache.get(&index).await?.as_deref() == Some(token) {
            self.cache.delete(&index).await?;
        }
        Ok(())
    }

    async fn replace_previous(&self, login_id: &str, device_type: &str) -> AppResult<()> {
        let index = cache_keys::login_token(login_id, device_type);
        let Some(previous) = self.cache.get(&index).await? else {
            return Ok(());
        };
        let Some(record) = self.load(&previous).await? else {
            return Ok(());
        };

        self.cache.delete(&cache_keys::access_token(&previous)).await?;
        info!(login_id, device_type, "Previous token replaced by new login");
        self.listener
            .on_event(LifecycleEvent::Replaced(record.context(&previous, None)))
            .await;
        Ok(())
    }
}

#[async_trait]
impl TokenManager for CacheTokenManager {
    async fn login(&self, login_id: &str, parameter: LoginParameter) -> AppResult<IssuedToken> {
        if !self.is_concurrent {
            self.replace_previous(login_id, &parameter.device_type).await?;
        }

        let token = Self::new_token();
        let record = TokenRecord {
            login_id: login_id.to_string(),
            device_type: parameter.device_type.clone(),
            timeout: parameter.timeout,
            extras: parameter.extras,
        };
        let ttl = record.timeout.as_duration();

        // Taken before the write so the deadline never lies past the key's expiry.
        let written_at = Instant::now();
        self.cache
            .set_json(&cache_keys::access_token(&token), &record, ttl)
            .await?;
        self.cache
            .set(
                &cache_keys::login_token(login_id, &record.device_type),
                &token,
                ttl,
            )
            .await?;
        debug!(login_id, device_type = %record.device_type, "Token issued");

        self.listener
            .on_event(LifecycleEvent::Login(record.written_context(
                &token,
                written_at,
                Some(parameter.request),
            )))
            .await;

        Ok(IssuedToken {
            access_token: token,
            expire_in: record.timeout.as_secs(),
        })
    }

    async fn logout(&self, token: &str) -> AppResult<()> {
        let record = self.load_valid(token).await?;
        self.invalidate(token, &record).await?;
        self.listener
            .on_event(LifecycleEvent::Logout(record.context(token, None)))
            .await;
        Ok(())
    }

    async fn kickout(&self, token: &str) -> AppResult<()> {
        let record = self.load_valid(token).await?;
        self.invalidate(token, &record).await?;
        info!(login_id = %record.login_id, "Token kicked out");
        self.listener
            .on_event(LifecycleEvent::Kickout(record.context(token, None)))
            .await;
        Ok(())
    }

    async fn renew(&self, token: &str, timeout: TokenTimeout) -> AppResult<()> {
        let mut record = self.load_valid(token).await?;
        record.timeout = timeout;
        let written_at = Instant::now();
        self.cache
            .set_json(&cache_keys::access_token(token), &record, timeout.as_duration())
            .await?;
        self.listener
            .on_event(LifecycleEvent::Renewed {
                context: record.written_context(token, written_at, None),
                timeout,
            })
            .await;
        Ok(())
    }

    async fn extras(&self, token: &str) -> AppResult<Option<TokenExtras>> {
        Ok(self.load(token).await?.map(|record| record.extras))
    }

    async fn remaining(&self, token: &str) -> AppResult<KeyTtl> {
        self.cache.ttl(&cache_keys::access_token(token)).await
    }
}
