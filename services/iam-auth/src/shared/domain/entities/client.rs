use serde::{Deserialize, Serialize};

use super::RecordStatus;
use crate::shared::domain::value_objects::TokenTimeout;

/// Registered login client (web console, mobile app, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    pub client_id: String,
    pub client_key: String,
    pub grant_types: Vec<String>,
    pub device_type: String,
    pub status: RecordStatus,
    /// Token lifetime for logins through this client; the configured default
    /// applies when unset.
    pub timeout: Option<TokenTimeout>,
}

impl ClientRecord {
    pub fn new(
        client_id: impl Into<String>,
        client_key: impl Into<String>,
        grant_types: &[&str],
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_key: client_key.into(),
            grant_types: grant_types.iter().map(|g| g.to_string()).collect(),
            device_type: "pc".to_string(),
            status: RecordStatus::Normal,
            timeout: None,
        }
    }

    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = device_type.into();
        self
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_timeout(mut self, timeout: TokenTimeout) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn supports_grant_type(&self, grant_type: &str) -> bool {
        self.grant_types.iter().any(|g| g == grant_type)
    }
}
