use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_common::TenantId;

use super::RecordStatus;

/// Tenant as seen by login and registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantRecord {
    pub tenant_id: TenantId,
    pub company_name: String,
    pub status: RecordStatus,
    pub expire_time: Option<DateTime<Utc>>,
}

impl TenantRecord {
    pub fn new(tenant_id: impl Into<TenantId>, company_name: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            company_name: company_name.into(),
            status: RecordStatus::Normal,
            expire_time: None,
        }
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_expire_time(mut self, expire_time: DateTime<Utc>) -> Self {
        self.expire_time = Some(expire_time);
        self
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_time.is_some_and(|expire| expire < now)
    }
}
