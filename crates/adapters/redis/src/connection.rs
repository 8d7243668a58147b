//! Redis connection management

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::debug;
use warden_errors::{AppError, AppResult};

/// Open a client and a reconnecting connection manager.
pub async fn create_connection_manager(url: &str) -> AppResult<ConnectionManager> {
    let client = Client::open(url)
        .map_err(|e| AppError::internal(format!("Invalid Redis url: {}", e)))?;

    let manager = ConnectionManager::new(client).await.map_err(|e| {
        AppError::external_service(format!("Failed to connect to Redis: {}", e))
    })?;
    debug!("Redis connection manager created");
    Ok(manager)
}

/// PING
pub async fn check_connection(conn: &mut ConnectionManager) -> AppResult<()> {
    redis::cmd("PING")
        .query_async::<String>(conn)
        .await
        .map_err(|e| AppError::external_service(format!("Redis health check failed: {}", e)))?;
    Ok(())
}
