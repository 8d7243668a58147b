use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_common::{TenantId, UserId};

use super::RecordStatus;

pub const DEFAULT_USER_TYPE: &str = "sys_user";

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub tenant_id: TenantId,
    pub dept_id: Option<i64>,
    pub username: String,
    pub nickname: String,
    pub user_type: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub phonenumber: Option<String>,
    pub email: Option<String>,
    pub status: RecordStatus,
    pub login_ip: Option<String>,
    pub login_date: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn new(
        user_id: UserId,
        tenant_id: impl Into<TenantId>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let username = username.into();
        Self {
            user_id,
            tenant_id: tenant_id.into(),
            dept_id: None,
            nickname: username.clone(),
            username,
            user_type: DEFAULT_USER_TYPE.to_string(),
            password_hash: password_hash.into(),
            phonenumber: None,
            email: None,
            status: RecordStatus::Normal,
            login_ip: None,
            login_date: None,
        }
    }

    pub fn with_dept(mut self, dept_id: i64) -> Self {
        self.dept_id = Some(dept_id);
        self
    }

    pub fn with_phonenumber(mut self, phonenumber: impl Into<String>) -> Self {
        self.phonenumber = Some(phonenumber.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    /// Identity the token framework logs in, e.g. `sys_user:42`.
    pub fn login_id(&self) -> String {
        format!("{}:{}", self.user_type, self.user_id)
    }
}

/// Account created by self-registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub tenant_id: TenantId,
    pub username: String,
    pub nickname: String,
    pub user_type: String,
    pub password_hash: String,
}
