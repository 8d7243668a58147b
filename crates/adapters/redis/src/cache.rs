//! Redis cache

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisResult};
use warden_errors::{AppError, AppResult};
use warden_ports::{CachePort, KeyTtl};

const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

/// Redis-backed [`CachePort`].
///
/// Every command is bounded by `command_timeout`; errors and timeouts surface as
/// `AppError::ExternalService`.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    command_timeout: Duration,
}

impl RedisCache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self {
            conn,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    async fn run<T, F>(&self, op: &'static str, fut: F) -> AppResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.command_timeout, fut).await {
            Ok(result) => {
                result.map_err(|e| AppError::external_service(format!("Redis {} failed: {}", op, e)))
            }
            Err(_) => Err(AppError::external_service(format!(
                "Redis {} timed out after {}ms",
                op,
                self.command_timeout.as_millis()
            ))),
        }
    }
}

fn millis(ttl: Duration) -> u64 {
    (ttl.as_millis() as u64).max(1)
}

#[async_trait]
impl CachePort for RedisCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        self.run("get", async move { conn.get(key).await }).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        let mut conn = self.conn.clone();
        self.run("set", async move {
            let mut cmd = redis::cmd("SET");
            cmd.arg(key).arg(value);
            if let Some(ttl) = ttl {
                cmd.arg("PX").arg(millis(ttl));
            }
            cmd.query_async::<()>(&mut conn).await
        })
        .await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.conn.clone();
        self.run("delete", async move { conn.del::<_, ()>(key).await })
            .await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.conn.clone();
        self.run("exists", async move { conn.exists(key).await })
            .await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<()> {
        let mut conn = self.conn.clone();
        self.run("expire", async move {
            conn.pexpire::<_, ()>(key, millis(ttl) as i64).await
        })
        .await
    }

    async fn ttl(&self, key: &str) -> AppResult<KeyTtl> {
        let mut conn = self.conn.clone();
        let pttl: i64 = self
            .run("pttl", async move { conn.pttl(key).await })
            .await?;

        // -2: missing, -1: no expiry
        Ok(match pttl {
            -2 => KeyTtl::Missing,
            -1 => KeyTtl::Persistent,
            ms => KeyTtl::Expires(Duration::from_millis(ms.max(0) as u64)),
        })
    }
}
