//! Cache key layout
//!
//! Tenant-scoped keys follow `{tenant}:{kind}:{id}`; keys that must be readable
//! before the tenant is known live under `global:`.

use warden_common::{TenantId, UserId};

pub const ONLINE_TOKEN_KIND: &str = "online_tokens";
pub const PWD_ERR_CNT_KIND: &str = "pwd_err_cnt";

const GLOBAL: &str = "global";

/// Online session of `token` inside `tenant`.
pub fn online_session(tenant: &TenantId, token: &str) -> String {
    format!("{}:{}:{}", tenant, ONLINE_TOKEN_KIND, token)
}

/// Failed-login counter of `account` inside `tenant`.
pub fn login_failures(tenant: &TenantId, account: &str) -> String {
    format!("{}:{}:{}", tenant, PWD_ERR_CNT_KIND, account)
}

pub fn captcha_code(id: &str) -> String {
    format!("{}:captcha_codes:{}", GLOBAL, id)
}

/// Tenant a super administrator is currently acting as.
pub fn dynamic_tenant(user_id: UserId) -> String {
    format!("{}:dynamic_tenant:{}", GLOBAL, user_id)
}

pub fn access_token(token: &str) -> String {
    format!("{}:auth_token:{}", GLOBAL, token)
}

/// Latest token of a login id on one device type.
pub fn login_token(login_id: &str, device_type: &str) -> String {
    format!("{}:login_token:{}:{}", GLOBAL, login_id, device_type)
}
