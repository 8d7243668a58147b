//! Failed-login counter with TTL lockout
//!
//! The counter lives at `{tenant}:pwd_err_cnt:{account}`. Every failure rewrites
//! it with a fresh TTL of the lock duration, so the lockout window restarts on
//! each attempt; a success deletes it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use warden_common::TenantId;
use warden_config::LoginConfig;
use warden_errors::{AppError, AppResult};
use warden_ports::{CachePort, KeyTtl};

use crate::auth::domain::cache_keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Credentials accepted, counter cleared.
    Passed,
    /// Failure counted, account still open.
    AttemptRecorded { attempts: u32, remaining: u32 },
    LockedOut { max_attempts: u32, lock_minutes: u64 },
}

pub struct LoginThrottle {
    cache: Arc<dyn CachePort>,
    max_attempts: u32,
    lock_minutes: u64,
}

impl LoginThrottle {
    pub fn new(cache: Arc<dyn CachePort>, config: &LoginConfig) -> Self {
        Self {
            cache,
            max_attempts: config.max_retry_count.max(1),
            lock_minutes: config.lock_time_minutes,
        }
    }

    fn lock_duration(&self) -> Duration {
        Duration::from_secs(self.lock_minutes * 60)
    }

    fn locked_out(&self) -> ThrottleDecision {
        ThrottleDecision::LockedOut {
            max_attempts: self.max_attempts,
            lock_minutes: self.lock_minutes,
        }
    }

    /// A counter that cannot be parsed reads as `max_attempts`, keeping the
    /// account locked until the window expires or it is unlocked.
    pub async fn failure_count(&self, tenant: &TenantId, account: &str) -> AppResult<u32> {
        let key = cache_keys::login_failures(tenant, account);
        let count = match self.cache.get(&key).await? {
            Some(raw) => raw.trim().parse::<u32>().unwrap_or_else(|_| {
                warn!(key = %key, value = %raw, "Unparseable failure counter, treating as locked");
                self.max_attempts
            }),
            None => 0,
        };
        Ok(count)
    }

    /// Consult the lockout state, then evaluate `failed` and record the outcome.
    ///
    /// `failed` resolves to `true` when the credential check failed. It is only
    /// polled when the account is not already locked, so no credential work is
    /// done for a locked account. An error from `failed` is returned as is and
    /// records nothing. Cache errors are converted into `E`; callers must reject
    /// the login.
    pub async fn check_and_record<F, E>(
        &self,
        tenant: &TenantId,
        account: &str,
        failed: F,
    ) -> Result<ThrottleDecision, E>
    where
        F: Future<Output = Result<bool, E>> + Send,
        E: From<AppError>,
    {
        let count = self.failure_count(tenant, account).await.map_err(E::from)?;
        if count >= self.max_attempts {
            info!(tenant_id = %tenant, account, count, "Login rejected, account locked");
            return Ok(self.locked_out());
        }

        let key = cache_keys::login_failures(tenant, account);
        if !failed.await? {
            if count > 0 {
                self.cache.delete(&key).await.map_err(E::from)?;
            }
            return Ok(ThrottleDecision::Passed);
        }

        let attempts = count + 1;
        self.cache
            .set(&key, &attempts.to_string(), Some(self.lock_duration()))
            .await
            .map_err(E::from)?;

        if attempts >= self.max_attempts {
            info!(
                tenant_id = %tenant,
                account,
                attempts,
                lock_minutes = self.lock_minutes,
                "Account locked after repeated failures"
            );
            Ok(self.locked_out())
        } else {
            debug!(tenant_id = %tenant, account, attempts, "Failed login recorded");
            Ok(ThrottleDecision::AttemptRecorded {
                attempts,
                remaining: self.max_attempts - attempts,
            })
        }
    }

    /// Time left on the current window; `None` if there is no counter.
    pub async fn remaining_lock(&self, tenant: &TenantId, account: &str) -> AppResult<Option<Duration>> {
        let key = cache_keys::login_failures(tenant, account);
        Ok(match self.cache.ttl(&key).await? {
            KeyTtl::Expires(left) => Some(left),
            KeyTtl::Persistent => Some(self.lock_duration()),
            KeyTtl::Missing => None,
        })
    }

    /// Administrative reset
    pub async fn unlock(&self, tenant: &TenantId, account: &str) -> AppResult<()> {
        self.cache
            .delete(&cache_keys::login_failures(tenant, account))
            .await
    }
}
