//! One-time verification codes (image captcha, SMS and email codes)
//!
//! Codes are consumed on first read, whether or not they match.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::debug;
use warden_errors::AppResult;
use warden_ports::CachePort;

use crate::auth::domain::cache_keys;

const DEFAULT_TTL: Duration = Duration::from_secs(120);

pub struct CaptchaStore {
    cache: Arc<dyn CachePort>,
    ttl: Duration,
}

impl CaptchaStore {
    pub fn new(cache: Arc<dyn CachePort>) -> Self {
        Self {
            cache,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Generate and store a 6-digit code for `id`; delivery is up to the caller.
    pub async fn issue(&self, id: &str) -> AppResult<String> {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        self.store(id, &code, self.ttl).await?;
        debug!(ttl_secs = self.ttl.as_secs(), "Verification code issued");
        Ok(code)
    }

    /// `id` is the captcha uuid, a phone number or an email address.
    pub async fn store(&self, id: &str, code: &str, ttl: Duration) -> AppResult<()> {
        self.cache
            .set(&cache_keys::captcha_code(id), code, Some(ttl))
            .await
    }

    pub async fn take(&self, id: &str) -> AppResult<Option<String>> {
        let key = cache_keys::captcha_code(id);
        let code = self.cache.get(&key).await?;
        if code.is_some() {
            self.cache.delete(&key).await?;
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_adapter_memory::MemoryCache;

    #[tokio::test]
    async fn test_code_is_single_use() {
        let store = CaptchaStore::new(Arc::new(MemoryCache::new()));
        store.store("uuid-1", "a7k2", Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.take("uuid-1").await.unwrap().as_deref(), Some("a7k2"));
        assert_eq!(store.take("uuid-1").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_issued_code_uses_configured_ttl() {
        let store =
            CaptchaStore::new(Arc::new(MemoryCache::new())).with_ttl(Duration::from_secs(30));
        let code = store.issue("13800000000").await.unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert_eq!(store.take("13800000000").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_code_expires() {
        let store = CaptchaStore::new(Arc::new(MemoryCache::new()));
        store.store("uuid-1", "a7k2", Duration::from_secs(60)).await.unwrap();

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(store.take("uuid-1").await.unwrap(), None);
    }
}
