use std::collections::BTreeSet;

use async_trait::async_trait;
use warden_common::UserId;
use warden_errors::AppResult;

use crate::shared::domain::entities::{DeptRecord, PostSummary, RoleSummary};

/// Role, permission and organisation data attached to a session.
#[async_trait]
pub trait PermissionDirectory: Send + Sync {
    async fn menu_permissions(&self, user_id: UserId) -> AppResult<BTreeSet<String>>;

    async fn role_keys(&self, user_id: UserId) -> AppResult<BTreeSet<String>>;

    async fn roles(&self, user_id: UserId) -> AppResult<Vec<RoleSummary>>;

    async fn posts(&self, user_id: UserId) -> AppResult<Vec<PostSummary>>;

    async fn find_dept(&self, dept_id: i64) -> AppResult<Option<DeptRecord>>;
}
