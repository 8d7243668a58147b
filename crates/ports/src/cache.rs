//! Key-value cache port

use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use warden_errors::AppResult;

/// Remaining lifetime of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    Missing,
    /// Stored without expiry.
    Persistent,
    Expires(Duration),
}

/// Cache port
///
/// Implementations must apply their own command timeout and report it as
/// `AppError::ExternalService`.
#[async_trait]
pub trait CachePort: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// `ttl = None` stores the value without expiry.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()>;

    /// Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    async fn exists(&self, key: &str) -> AppResult<bool>;

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<()>;

    async fn ttl(&self, key: &str) -> AppResult<KeyTtl>;
}

/// JSON helpers on top of [`CachePort`].
#[async_trait]
pub trait CacheExt: CachePort {
    async fn get_json<T>(&self, key: &str) -> AppResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T>(&self, key: &str, value: &T, ttl: Option<Duration>) -> AppResult<()>
    where
        T: Serialize + Sync,
    {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw, ttl).await
    }
}

impl<C: CachePort + ?Sized> CacheExt for C {}
