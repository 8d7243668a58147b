use serde::{Deserialize, Serialize};
use warden_common::{TenantId, UserId};

/// Returned to the caller after a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    pub access_token: String,
    /// Seconds until expiry, `-1` for a non-expiring token.
    pub expire_in: i64,
    pub client_id: String,
    pub tenant_id: TenantId,
    pub user_id: UserId,
}
