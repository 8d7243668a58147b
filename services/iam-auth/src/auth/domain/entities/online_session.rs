use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_common::{TenantId, UserId};

/// One live token as listed by the online-user view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineSession {
    pub token_id: String,
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub username: String,
    pub client_key: String,
    pub device_type: String,
    pub ipaddr: String,
    pub login_location: String,
    pub browser: String,
    pub os: String,
    pub dept_name: Option<String>,
    pub login_time: DateTime<Utc>,
}
