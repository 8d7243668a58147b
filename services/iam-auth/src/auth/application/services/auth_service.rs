//! Login and logout entry points

use std::sync::Arc;

use tracing::{Span, debug, field, info, instrument, warn};
use warden_common::{TenantId, UserId};
use warden_errors::AppError;

use super::{LoginService, WelcomeScheduler};
use crate::auth::application::commands::{LoginBody, parse_body};
use crate::auth::application::strategies::AuthStrategyRegistry;
use crate::auth::domain::entities::{LoginResult, SessionPrincipal};
use crate::auth::domain::events::AuditKind;
use crate::auth::domain::token::{TokenExtras, TokenManager};
use crate::auth::infrastructure::cache::DynamicTenantStore;
use crate::error::AuthError;
use crate::infrastructure::observability::metrics::{self, OperationTimer};
use crate::shared::domain::entities::{ClientRecord, UserRecord};
use crate::shared::domain::repositories::ClientDirectory;
use crate::shared::domain::value_objects::RequestMeta;

pub struct AuthService {
    login: Arc<LoginService>,
    strategies: AuthStrategyRegistry,
    clients: Arc<dyn ClientDirectory>,
    tokens: Arc<dyn TokenManager>,
    dynamic_tenants: Arc<DynamicTenantStore>,
    welcome: WelcomeScheduler,
}

impl AuthService {
    pub fn new(
        login: Arc<LoginService>,
        strategies: AuthStrategyRegistry,
        clients: Arc<dyn ClientDirectory>,
        tokens: Arc<dyn TokenManager>,
        dynamic_tenants: Arc<DynamicTenantStore>,
        welcome: WelcomeScheduler,
    ) -> Self {
        Self {
            login,
            strategies,
            clients,
            tokens,
            dynamic_tenants,
            welcome,
        }
    }

    /// Authenticate a raw login body.
    ///
    /// The client must exist, declare the requested grant type and be active;
    /// the tenant must pass validation; then exactly one strategy runs.
    #[instrument(skip_all, fields(client_id = field::Empty, grant_type = field::Empty, ip = %request.ip))]
    pub async fn login(
        &self,
        raw_body: &str,
        request: &RequestMeta,
    ) -> Result<LoginResult, AuthError> {
        let _timer = OperationTimer::new("login");
        let body: LoginBody = parse_body(raw_body)?;
        body.validate()?;
        Span::current().record("client_id", body.client_id.as_str());
        Span::current().record("grant_type", body.grant_type.as_str());

        let request = request.clone().with_client_id(body.client_id.clone());
        let client = self.resolve_client(&body).await?;
        self.login.check_tenant(body.tenant_id.as_deref()).await?;

        let result = self
            .strategies
            .login(raw_body, &client, &request, &body.grant_type)
            .await;
        metrics::record_login_attempt(result.is_ok(), &body.grant_type);
        let result = result?;

        info!(tenant_id = %result.tenant_id, user_id = %result.user_id, "Login succeeded");
        self.welcome.schedule(result.user_id);
        Ok(result)
    }

    async fn resolve_client(&self, body: &LoginBody) -> Result<ClientRecord, AuthError> {
        let client = self.clients.find_by_client_id(&body.client_id).await?;
        let client = match client {
            Some(client) if client.supports_grant_type(&body.grant_type) => client,
            _ => {
                info!(
                    client_id = %body.client_id,
                    grant_type = %body.grant_type,
                    "Client missing or grant type not allowed"
                );
                metrics::record_login_rejected("grant_type");
                return Err(AuthError::GrantTypeMismatch {
                    client_id: body.client_id.clone(),
                    grant_type: body.grant_type.clone(),
                });
            }
        };
        if !client.status.is_normal() {
            metrics::record_login_rejected("client_blocked");
            return Err(AuthError::ClientBlocked(client.client_id));
        }
        Ok(client)
    }

    /// End the session behind `token`.
    ///
    /// Never fails: a missing or already invalid token is ignored and store
    /// failures are logged. The token is always invalidated when possible.
    #[instrument(skip_all)]
    pub async fn logout(
        &self,
        token: Option<&str>,
        request: &RequestMeta,
    ) -> Result<(), AuthError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(());
        };

        match self.tokens.extras(token).await {
            Ok(Some(extras)) => self.before_logout(&extras, request).await,
            Ok(None) => {
                debug!("Logout without a live session");
                return Ok(());
            }
            Err(e) => {
                warn!(error = %e, "Failed to load token state on logout");
                metrics::record_logout_failure("load");
            }
        }

        match self.tokens.logout(token).await {
            Ok(()) => info!("Logged out"),
            Err(AppError::Unauthenticated(_)) => debug!("Token already invalid"),
            Err(e) => {
                warn!(error = %e, "Failed to invalidate token on logout");
                metrics::record_logout_failure("invalidate");
            }
        }
        Ok(())
    }

    async fn before_logout(&self, extras: &TokenExtras, request: &RequestMeta) {
        if self.login.is_multi_tenant() && extras.user_id.is_super_admin() {
            if let Err(e) = self.dynamic_tenants.clear(extras.user_id).await {
                warn!(user_id = %extras.user_id, error = %e, "Failed to clear dynamic tenant");
            }
        }

        let request = request.clone().with_client_id(extras.client_id.clone());
        self.login.record_login_info(
            &extras.tenant_id,
            &extras.username,
            AuditKind::Logout,
            "Logout successful",
            &request,
        );
        debug!(tenant_id = %extras.tenant_id, username = %extras.username, "Logging out");
    }

    /// Force a session to end; `false` when the token was not live.
    #[instrument(skip_all)]
    pub async fn kickout(&self, token: &str) -> Result<bool, AuthError> {
        match self.tokens.kickout(token).await {
            Ok(()) => Ok(true),
            Err(AppError::Unauthenticated(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn check_tenant(&self, tenant_id: Option<&str>) -> Result<TenantId, AuthError> {
        self.login.check_tenant(tenant_id).await
    }

    pub async fn build_session_principal(
        &self,
        user: &UserRecord,
    ) -> Result<SessionPrincipal, AuthError> {
        self.login.build_session_principal(user).await
    }

    pub async fn unlock(&self, tenant: &TenantId, username: &str) -> Result<(), AuthError> {
        self.login.unlock(tenant, username).await
    }

    /// Let the super administrator act as another tenant until logout.
    pub async fn act_as_tenant(
        &self,
        user_id: UserId,
        tenant_id: &str,
    ) -> Result<TenantId, AuthError> {
        if !user_id.is_super_admin() {
            return Err(AuthError::InvalidRequest(
                "Only the super administrator may switch tenants".into(),
            ));
        }
        let tenant = self.login.check_tenant(Some(tenant_id)).await?;
        self.dynamic_tenants.set(user_id, &tenant).await?;
        Ok(tenant)
    }

    pub async fn acting_tenant(&self, user_id: UserId) -> Result<Option<TenantId>, AuthError> {
        Ok(self.dynamic_tenants.get(user_id).await?)
    }
}
