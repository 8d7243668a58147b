use async_trait::async_trait;
use warden_errors::AppResult;

use crate::shared::domain::entities::ClientRecord;

#[async_trait]
pub trait ClientDirectory: Send + Sync {
    async fn find_by_client_id(&self, client_id: &str) -> AppResult<Option<ClientRecord>>;
}
