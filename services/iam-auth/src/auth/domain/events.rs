//! Login audit events
//!
//! Producers hand a [`LoginInfoEvent`] to an [`AuditPublisher`]; a worker turns it
//! into an immutable [`AuditRecord`] and appends it to an [`AuditSink`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warden_common::TenantId;
use warden_errors::AppResult;

use crate::shared::domain::value_objects::RequestMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    LoginSuccess,
    LoginFail,
    Logout,
    Register,
}

impl AuditKind {
    pub fn status(&self) -> AuditStatus {
        match self {
            Self::LoginFail => AuditStatus::Fail,
            Self::LoginSuccess | Self::Logout | Self::Register => AuditStatus::Success,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoginSuccess => "login_success",
            Self::LoginFail => "login_fail",
            Self::Logout => "logout",
            Self::Register => "register",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Success,
    Fail,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Fail => "Error",
        }
    }
}

/// What happened, as seen on the request path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInfoEvent {
    pub tenant_id: TenantId,
    pub username: String,
    pub kind: AuditKind,
    pub message: String,
    pub request: RequestMeta,
    pub occurred_at: DateTime<Utc>,
}

impl LoginInfoEvent {
    pub fn new(
        tenant_id: TenantId,
        username: impl Into<String>,
        kind: AuditKind,
        message: impl Into<String>,
        request: RequestMeta,
    ) -> Self {
        Self {
            tenant_id,
            username: username.into(),
            kind,
            message: message.into(),
            request,
            occurred_at: Utc::now(),
        }
    }
}

/// Persisted audit fact; never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub tenant_id: TenantId,
    pub username: String,
    pub kind: AuditKind,
    pub status: AuditStatus,
    pub message: String,
    pub ipaddr: String,
    pub login_location: String,
    pub browser: String,
    pub os: String,
    pub client_key: String,
    pub device_type: String,
    pub login_time: DateTime<Utc>,
}

impl AuditRecord {
    /// `[ip][location][username][status][message]`
    pub fn log_line(&self) -> String {
        format!(
            "[{}][{}][{}][{}][{}]",
            self.ipaddr,
            self.login_location,
            self.username,
            self.status.as_str(),
            self.message
        )
    }
}

/// Fire-and-forget publication; must never block or fail the caller.
pub trait AuditPublisher: Send + Sync {
    fn publish(&self, event: LoginInfoEvent);
}

/// Append-only audit store
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, record: AuditRecord) -> AppResult<()>;
}
