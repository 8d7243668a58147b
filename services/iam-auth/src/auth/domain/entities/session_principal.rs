use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use warden_common::{TenantId, UserId};

use crate::shared::domain::entities::{PostSummary, RoleSummary};

pub const SUPER_ADMIN_ROLE_KEY: &str = "superadmin";
pub const ALL_PERMISSION: &str = "*:*:*";

/// Identity and grants attached to an authenticated session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionPrincipal {
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub dept_id: Option<i64>,
    pub dept_name: Option<String>,
    pub dept_category: Option<String>,
    pub username: String,
    pub nickname: String,
    pub user_type: String,
    pub menu_permissions: BTreeSet<String>,
    pub role_permissions: BTreeSet<String>,
    pub roles: Vec<RoleSummary>,
    pub posts: Vec<PostSummary>,
    pub client_key: Option<String>,
    pub device_type: Option<String>,
}

impl SessionPrincipal {
    pub fn login_id(&self) -> String {
        format!("{}:{}", self.user_type, self.user_id)
    }

    pub fn is_super_admin(&self) -> bool {
        self.user_id.is_super_admin()
    }
}
