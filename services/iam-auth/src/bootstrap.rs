//! Composition root
//!
//! Builds every service of the module from [`AppConfig`] and the external
//! collaborators. Must be called inside a Tokio runtime: the audit workers are
//! spawned here.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tracing::{info, warn};
use warden_adapter_redis::{RedisCache, check_connection, create_connection_manager};
use warden_common::{RetryConfig, with_retry};
use warden_config::{AppConfig, GeoConfig, RedisConfig, TelemetryConfig};
use warden_errors::AppResult;
use warden_ports::CachePort;
use warden_telemetry::TelemetryError;

use crate::auth::application::listeners::SessionLifecycleHooks;
use crate::auth::application::services::{
    AuthService, LoggingWelcomeNotifier, LoginService, RegisterService, WelcomeNotifier,
    WelcomeScheduler,
};
use crate::auth::application::strategies::{
    AuthStrategyRegistry, EmailAuthStrategy, GRANT_EMAIL, GRANT_PASSWORD, GRANT_SMS,
    PasswordAuthStrategy, SmsAuthStrategy,
};
use crate::auth::domain::events::{AuditPublisher, AuditSink};
use crate::auth::domain::repositories::SessionRegistry;
use crate::auth::domain::services::{LoginThrottle, TenantValidator};
use crate::auth::domain::token::TokenManager;
use crate::auth::infrastructure::cache::{CacheSessionRegistry, CaptchaStore, DynamicTenantStore};
use crate::auth::infrastructure::events::{
    AuditProcessor, AuditWorkerPool, ChannelAuditPublisher, LoggingAuditSink,
};
use crate::auth::infrastructure::token::CacheTokenManager;
use crate::shared::domain::repositories::{
    ClientDirectory, PermissionDirectory, TenantDirectory, UserDirectory,
};
use crate::shared::domain::value_objects::TokenTimeout;
use crate::shared::infrastructure::geo::{GeoIpResolver, HttpGeoIpResolver, NoopGeoIpResolver};
use crate::shared::infrastructure::persistence::InMemoryDirectories;

/// Components owned by other services.
#[derive(Clone)]
pub struct Collaborators {
    pub cache: Arc<dyn CachePort>,
    pub users: Arc<dyn UserDirectory>,
    pub clients: Arc<dyn ClientDirectory>,
    pub tenants: Arc<dyn TenantDirectory>,
    pub permissions: Arc<dyn PermissionDirectory>,
    pub audit_sink: Arc<dyn AuditSink>,
    pub geo: Arc<dyn GeoIpResolver>,
    pub notifier: Arc<dyn WelcomeNotifier>,
}

impl Collaborators {
    /// In-memory directories with logging sink and notifier.
    pub fn in_memory(cache: Arc<dyn CachePort>, directories: &InMemoryDirectories) -> Self {
        Self {
            cache,
            users: directories.users.clone(),
            clients: directories.clients.clone(),
            tenants: directories.tenants.clone(),
            permissions: directories.permissions.clone(),
            audit_sink: Arc::new(LoggingAuditSink),
            geo: Arc::new(NoopGeoIpResolver),
            notifier: Arc::new(LoggingWelcomeNotifier),
        }
    }

    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = sink;
        self
    }

    pub fn with_geo(mut self, geo: Arc<dyn GeoIpResolver>) -> Self {
        self.geo = geo;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn WelcomeNotifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

pub struct AuthModule {
    pub auth: Arc<AuthService>,
    pub register: Arc<RegisterService>,
    pub login: Arc<LoginService>,
    pub sessions: Arc<dyn SessionRegistry>,
    pub tokens: Arc<dyn TokenManager>,
    pub captcha: Arc<CaptchaStore>,
    pub audit: Arc<dyn AuditPublisher>,
    audit_workers: AuditWorkerPool,
}

impl AuthModule {
    pub fn build(config: &AppConfig, c: Collaborators) -> Self {
        // Audit pipeline
        let (publisher, receiver) = ChannelAuditPublisher::channel(config.audit.queue_capacity);
        let processor = AuditProcessor::new(
            c.audit_sink.clone(),
            c.clients.clone(),
            c.geo.clone(),
            config.geo.timeout(),
        )
        .with_retry(RetryConfig::new(
            config.audit.sink_retry_attempts,
            Duration::from_millis(100),
            Duration::from_secs(2),
        ));
        let audit_workers =
            AuditWorkerPool::start(receiver, Arc::new(processor), config.audit.workers);
        let audit: Arc<dyn AuditPublisher> = Arc::new(publisher);

        // Sessions and tokens
        let sessions: Arc<dyn SessionRegistry> =
            Arc::new(CacheSessionRegistry::new(c.cache.clone()));
        let hooks = Arc::new(SessionLifecycleHooks::new(
            sessions.clone(),
            audit.clone(),
            c.users.clone(),
            c.geo.clone(),
            config.geo.timeout(),
        ));
        let tokens: Arc<dyn TokenManager> = Arc::new(
            CacheTokenManager::new(c.cache.clone(), hooks)
                .with_concurrent(config.token.is_concurrent),
        );

        // Login
        let captcha =
            Arc::new(CaptchaStore::new(c.cache.clone()).with_ttl(config.captcha.expiration()));
        let login = Arc::new(LoginService::new(
            Arc::new(TenantValidator::new(c.tenants.clone(), &config.tenant)),
            LoginThrottle::new(c.cache.clone(), &config.login),
            audit.clone(),
            captcha.clone(),
            config.captcha.enabled,
            c.permissions.clone(),
            tokens.clone(),
            TokenTimeout::from(config.token.timeout_secs),
        ));

        let strategies = AuthStrategyRegistry::new()
            .with(
                GRANT_PASSWORD,
                Arc::new(PasswordAuthStrategy::new(login.clone(), c.users.clone())),
            )
            .with(
                GRANT_SMS,
                Arc::new(SmsAuthStrategy::new(login.clone(), c.users.clone())),
            )
            .with(
                GRANT_EMAIL,
                Arc::new(EmailAuthStrategy::new(login.clone(), c.users.clone())),
            );
        info!(grant_types = ?strategies.grant_types(), "Auth strategies registered");

        let auth = Arc::new(AuthService::new(
            login.clone(),
            strategies,
            c.clients.clone(),
            tokens.clone(),
            Arc::new(DynamicTenantStore::new(c.cache.clone())),
            WelcomeScheduler::new(c.notifier.clone(), &config.welcome),
        ));
        let register = Arc::new(RegisterService::new(
            login.clone(),
            c.users.clone(),
            config.register.enabled,
        ));

        Self {
            auth,
            register,
            login,
            sessions,
            tokens,
            captcha,
            audit,
            audit_workers,
        }
    }

    /// Drain queued audit events and stop the workers.
    pub async fn shutdown(&self) {
        self.audit_workers.shutdown().await;
    }
}

/// Connect to Redis, retrying transient failures.
pub async fn connect_redis(config: &RedisConfig) -> AppResult<RedisCache> {
    let retry = RetryConfig::new(
        config.connect_attempts,
        Duration::from_millis(200),
        Duration::from_secs(5),
    );
    let mut conn = with_retry(&retry, "redis_connect", || {
        let url = config.url.expose_secret().clone();
        async move { create_connection_manager(&url).await }
    })
    .await?;
    check_connection(&mut conn).await?;
    info!(command_timeout_ms = config.command_timeout_ms, "Redis connected");
    Ok(RedisCache::new(conn).with_command_timeout(config.command_timeout()))
}

pub fn geo_resolver(config: &GeoConfig) -> AppResult<Arc<dyn GeoIpResolver>> {
    if !config.enabled {
        return Ok(Arc::new(NoopGeoIpResolver));
    }
    Ok(Arc::new(HttpGeoIpResolver::new(
        config.endpoint.clone(),
        config.timeout(),
    )?))
}

pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    warden_telemetry::init(&config.log_level, config.json)
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
