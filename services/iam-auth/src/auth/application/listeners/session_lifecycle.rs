//! Online-session bookkeeping driven by token lifecycle events
//!
//! Every event is handled inside `with_tenant(<tenant of the token>)`, so the
//! registry only ever touches the namespace the token was issued in. Failures
//! are logged and counted; they never reach the login or logout caller.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info, warn};
use warden_common::with_tenant;

use crate::auth::domain::entities::OnlineSession;
use crate::auth::domain::events::{AuditKind, AuditPublisher, LoginInfoEvent};
use crate::auth::domain::repositories::SessionRegistry;
use crate::auth::domain::token::{LifecycleEvent, TokenContext, TokenListener};
use crate::infrastructure::observability::metrics;
use crate::shared::domain::repositories::UserDirectory;
use crate::shared::domain::value_objects::{RequestMeta, TokenTimeout};
use crate::shared::infrastructure::geo::{GeoIpResolver, resolve_location};

pub struct SessionLifecycleHooks {
    sessions: Arc<dyn SessionRegistry>,
    audit: Arc<dyn AuditPublisher>,
    users: Arc<dyn UserDirectory>,
    geo: Arc<dyn GeoIpResolver>,
    geo_timeout: Duration,
}

impl SessionLifecycleHooks {
    pub fn new(
        sessions: Arc<dyn SessionRegistry>,
        audit: Arc<dyn AuditPublisher>,
        users: Arc<dyn UserDirectory>,
        geo: Arc<dyn GeoIpResolver>,
        geo_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            audit,
            users,
            geo,
            geo_timeout,
        }
    }

    async fn on_login(&self, ctx: TokenContext) {
        let request = ctx.request.clone().unwrap_or_default();
        let agent = request.user_agent_info();
        let login_location = resolve_location(self.geo.as_ref(), &request.ip, self.geo_timeout).await;
        let extras = &ctx.extras;

        let session = OnlineSession {
            token_id: ctx.token.clone(),
            tenant_id: extras.tenant_id.clone(),
            user_id: extras.user_id,
            username: extras.username.clone(),
            client_key: extras.client_key.clone(),
            device_type: extras.device_type.clone(),
            ipaddr: request.ip.clone(),
            login_location,
            browser: agent.browser,
            os: agent.os,
            dept_name: extras.dept_name.clone(),
            login_time: Utc::now(),
        };

        let ttl = ctx.remaining_timeout();
        let stored = if ttl == TokenTimeout::Seconds(0) {
            debug!(tenant_id = %extras.tenant_id, "Token expired before its session was registered");
            Ok(false)
        } else {
            with_tenant(extras.tenant_id.clone(), self.sessions.put(&session, ttl))
                .await
                .map(|()| true)
        };
        match stored {
            Ok(true) => metrics::record_session_created(&extras.device_type),
            Ok(false) => {}
            Err(e) => {
                error!(
                    tenant_id = %extras.tenant_id,
                    username = %extras.username,
                    error = %e,
                    "Failed to register online session"
                );
                metrics::record_session_hook_failure("login");
            }
        }

        self.audit.publish(LoginInfoEvent::new(
            extras.tenant_id.clone(),
            extras.username.clone(),
            AuditKind::LoginSuccess,
            "Login successful",
            with_client(request.clone(), &extras.client_id),
        ));

        if let Err(e) = self
            .users
            .update_last_login(extras.user_id, &request.ip, session.login_time)
            .await
        {
            warn!(user_id = %extras.user_id, error = %e, "Failed to record last login");
        }

        info!(
            tenant_id = %extras.tenant_id,
            username = %extras.username,
            device_type = %extras.device_type,
            "Session opened"
        );
    }

    async fn on_session_end(&self, reason: &'static str, ctx: TokenContext) {
        let tenant = ctx.extras.tenant_id.clone();
        let removed = with_tenant(tenant.clone(), self.sessions.remove(&ctx.token)).await;
        match removed {
            Ok(()) => {
                metrics::record_session_revoked(reason);
                info!(tenant_id = %tenant, username = %ctx.extras.username, reason, "Session closed");
            }
            Err(e) => {
                error!(tenant_id = %tenant, reason, error = %e, "Failed to remove online session");
                metrics::record_session_hook_failure(reason);
            }
        }
    }
}

fn with_client(request: RequestMeta, client_id: &str) -> RequestMeta {
    if request.client_id.is_some() {
        request
    } else {
        request.with_client_id(client_id)
    }
}

#[async_trait]
impl TokenListener for SessionLifecycleHooks {
    async fn on_event(&self, event: LifecycleEvent) {
        let reason = event.name();
        match event {
            LifecycleEvent::Login(ctx) => self.on_login(ctx).await,
            LifecycleEvent::Logout(ctx)
            | LifecycleEvent::Kickout(ctx)
            | LifecycleEvent::Replaced(ctx) => self.on_session_end(reason, ctx).await,
            LifecycleEvent::Renewed { context, timeout } => {
                debug!(login_id = %context.login_id, timeout = timeout.as_secs(), "Token renewed");
            }
        }
    }
}
