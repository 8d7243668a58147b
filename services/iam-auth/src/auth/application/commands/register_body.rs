use serde::Deserialize;

use super::{require, require_length};
use crate::error::AuthError;
use crate::shared::domain::entities::DEFAULT_USER_TYPE;

const USER_TYPES: &[&str] = &[DEFAULT_USER_TYPE, "app_user"];

/// Self-service registration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub user_type: Option<String>,
    pub code: Option<String>,
    pub uuid: Option<String>,
}

impl RegisterBody {
    pub fn validate(&self) -> Result<(), AuthError> {
        require_length(&self.username, "username", 2, 30)?;
        require_length(&self.password, "password", 5, 30)?;
        if let Some(user_type) = &self.user_type {
            require(user_type, "userType")?;
            if !USER_TYPES.contains(&user_type.as_str()) {
                return Err(AuthError::InvalidRequest(format!(
                    "Unknown user type {}",
                    user_type
                )));
            }
        }
        Ok(())
    }

    pub fn user_type(&self) -> &str {
        self.user_type.as_deref().unwrap_or(DEFAULT_USER_TYPE)
    }
}
