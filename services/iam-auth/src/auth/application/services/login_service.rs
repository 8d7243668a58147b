//! Login steps shared by every grant type

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use warden_common::TenantId;

use crate::auth::domain::entities::{
    ALL_PERMISSION, LoginResult, SUPER_ADMIN_ROLE_KEY, SessionPrincipal,
};
use crate::auth::domain::events::{AuditKind, AuditPublisher, LoginInfoEvent};
use crate::auth::domain::login_type::LoginType;
use crate::auth::domain::services::{LoginThrottle, TenantValidator, ThrottleDecision};
use crate::auth::domain::token::{LoginParameter, TokenExtras, TokenManager};
use crate::auth::infrastructure::cache::CaptchaStore;
use crate::error::AuthError;
use crate::infrastructure::observability::metrics;
use crate::shared::domain::entities::{ClientRecord, UserRecord};
use crate::shared::domain::repositories::PermissionDirectory;
use crate::shared::domain::value_objects::{RequestMeta, TokenTimeout};

pub struct LoginService {
    tenants: Arc<TenantValidator>,
    throttle: LoginThrottle,
    audit: Arc<dyn AuditPublisher>,
    captcha: Arc<CaptchaStore>,
    captcha_enabled: bool,
    permissions: Arc<dyn PermissionDirectory>,
    tokens: Arc<dyn TokenManager>,
    default_timeout: TokenTimeout,
}

impl LoginService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenants: Arc<TenantValidator>,
        throttle: LoginThrottle,
        audit: Arc<dyn AuditPublisher>,
        captcha: Arc<CaptchaStore>,
        captcha_enabled: bool,
        permissions: Arc<dyn PermissionDirectory>,
        tokens: Arc<dyn TokenManager>,
        default_timeout: TokenTimeout,
    ) -> Self {
        Self {
            tenants,
            throttle,
            audit,
            captcha,
            captcha_enabled,
            permissions,
            tokens,
            default_timeout,
        }
    }

    pub async fn check_tenant(&self, tenant_id: Option<&str>) -> Result<TenantId, AuthError> {
        self.tenants.validate(tenant_id).await
    }

    pub fn is_multi_tenant(&self) -> bool {
        self.tenants.is_enabled()
    }

    pub fn record_login_info(
        &self,
        tenant: &TenantId,
        username: &str,
        kind: AuditKind,
        message: impl Into<String>,
        request: &RequestMeta,
    ) {
        self.audit.publish(LoginInfoEvent::new(
            tenant.clone(),
            username,
            kind,
            message,
            request.clone(),
        ));
    }

    /// Run the lockout check around a credential check.
    ///
    /// `failed` resolves to `true` when the credentials did not match and is not
    /// evaluated at all for a locked account. Every rejection is audited.
    pub async fn check_login<F>(
        &self,
        login_type: LoginType,
        tenant: &TenantId,
        username: &str,
        request: &RequestMeta,
        failed: F,
    ) -> Result<(), AuthError>
    where
        F: Future<Output = Result<bool, AuthError>> + Send,
    {
        let decision = self.throttle.check_and_record(tenant, username, failed).await?;

        let err = match decision {
            ThrottleDecision::Passed => return Ok(()),
            ThrottleDecision::AttemptRecorded { attempts, remaining } => {
                AuthError::InvalidCredentials {
                    login_type,
                    username: username.to_string(),
                    attempts,
                    remaining,
                }
            }
            ThrottleDecision::LockedOut {
                max_attempts,
                lock_minutes,
            } => {
                metrics::record_account_locked(&login_type.to_string());
                AuthError::LockedOut {
                    login_type,
                    username: username.to_string(),
                    max_attempts,
                    lock_minutes,
                }
            }
        };

        info!(tenant_id = %tenant, username, error = %err, "Login rejected");
        self.record_login_info(tenant, username, AuditKind::LoginFail, err.user_message(), request);
        Err(err)
    }

    /// Image captcha check for password login and registration.
    pub async fn validate_captcha(
        &self,
        tenant: &TenantId,
        username: &str,
        code: Option<&str>,
        uuid: Option<&str>,
        request: &RequestMeta,
    ) -> Result<(), AuthError> {
        if !self.captcha_enabled {
            return Ok(());
        }
        let stored = self.captcha.take(uuid.unwrap_or_default()).await?;
        let Some(stored) = stored else {
            return Err(self.reject(tenant, username, AuthError::CaptchaExpired, request));
        };
        if !stored.eq_ignore_ascii_case(code.unwrap_or_default().trim()) {
            return Err(self.reject(tenant, username, AuthError::CaptchaInvalid, request));
        }
        Ok(())
    }

    /// Consume an SMS or email code sent to `target`; `Ok(false)` on mismatch.
    pub async fn verify_one_time_code(
        &self,
        tenant: &TenantId,
        username: &str,
        target: &str,
        code: &str,
        request: &RequestMeta,
    ) -> Result<bool, AuthError> {
        match self.captcha.take(target).await? {
            Some(stored) => Ok(stored == code.trim()),
            None => Err(self.reject(tenant, username, AuthError::CaptchaExpired, request)),
        }
    }

    fn reject(
        &self,
        tenant: &TenantId,
        username: &str,
        err: AuthError,
        request: &RequestMeta,
    ) -> AuthError {
        self.record_login_info(tenant, username, AuditKind::LoginFail, err.user_message(), request);
        err
    }

    /// Identity and grants of `user` for the session about to be created.
    pub async fn build_session_principal(
        &self,
        user: &UserRecord,
    ) -> Result<SessionPrincipal, AuthError> {
        let (menu_permissions, role_permissions) = if user.user_id.is_super_admin() {
            (
                BTreeSet::from([ALL_PERMISSION.to_string()]),
                BTreeSet::from([SUPER_ADMIN_ROLE_KEY.to_string()]),
            )
        } else {
            (
                self.permissions.menu_permissions(user.user_id).await?,
                self.permissions.role_keys(user.user_id).await?,
            )
        };

        let (dept_name, dept_category) = match user.dept_id {
            Some(dept_id) => match self.permissions.find_dept(dept_id).await? {
                Some(dept) => (Some(dept.dept_name), dept.dept_category),
                None => (Some(String::new()), Some(String::new())),
            },
            None => (None, None),
        };

        Ok(SessionPrincipal {
            tenant_id: user.tenant_id.clone(),
            user_id: user.user_id,
            dept_id: user.dept_id,
            dept_name,
            dept_category,
            username: user.username.clone(),
            nickname: user.nickname.clone(),
            user_type: user.user_type.clone(),
            menu_permissions,
            role_permissions,
            roles: self.permissions.roles(user.user_id).await?,
            posts: self.permissions.posts(user.user_id).await?,
            client_key: None,
            device_type: None,
        })
    }

    /// Final step after the credentials were accepted: account status,
    /// principal and token.
    pub async fn complete_login(
        &self,
        user: UserRecord,
        client: &ClientRecord,
        request: &RequestMeta,
    ) -> Result<LoginResult, AuthError> {
        if !user.status.is_normal() {
            let err = AuthError::UserDisabled(user.username.clone());
            return Err(self.reject(&user.tenant_id, &user.username, err, request));
        }
        let principal = self.build_session_principal(&user).await?;
        self.issue_token(principal, client, request).await
    }

    pub async fn issue_token(
        &self,
        mut principal: SessionPrincipal,
        client: &ClientRecord,
        request: &RequestMeta,
    ) -> Result<LoginResult, AuthError> {
        principal.client_key = Some(client.client_key.clone());
        principal.device_type = Some(client.device_type.clone());

        let parameter = LoginParameter {
            device_type: client.device_type.clone(),
            timeout: client.timeout.unwrap_or(self.default_timeout),
            extras: TokenExtras {
                tenant_id: principal.tenant_id.clone(),
                user_id: principal.user_id,
                username: principal.username.clone(),
                client_id: client.client_id.clone(),
                client_key: client.client_key.clone(),
                device_type: client.device_type.clone(),
                dept_name: principal.dept_name.clone(),
            },
            request: request.clone(),
        };
        let issued = self.tokens.login(&principal.login_id(), parameter).await?;

        Ok(LoginResult {
            access_token: issued.access_token,
            expire_in: issued.expire_in,
            client_id: client.client_id.clone(),
            tenant_id: principal.tenant_id,
            user_id: principal.user_id,
        })
    }

    /// Clear the failure counter of an account.
    pub async fn unlock(&self, tenant: &TenantId, username: &str) -> Result<(), AuthError> {
        self.throttle.unlock(tenant, username).await?;
        warn!(tenant_id = %tenant, username, "Account unlocked by administrator");
        metrics::record_account_unlocked();
        Ok(())
    }

    /// How long the failure window of an account stays open.
    pub async fn lock_remaining(
        &self,
        tenant: &TenantId,
        username: &str,
    ) -> Result<Option<Duration>, AuthError> {
        Ok(self.throttle.remaining_lock(tenant, username).await?)
    }

    /// Failed attempts counted so far for an account.
    pub async fn failure_count(&self, tenant: &TenantId, username: &str) -> Result<u32, AuthError> {
        Ok(self.throttle.failure_count(tenant, username).await?)
    }
}
