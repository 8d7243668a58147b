//! Shared fixture: one tenant, one user, one client, in-memory everything.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use iam_auth::auth::domain::events::AuditSink;
use iam_auth::auth::domain::services::PasswordService;
use iam_auth::auth::infrastructure::events::{
    BroadcastAuditSink, InMemoryAuditSink, LoggingAuditSink,
};
use iam_auth::shared::domain::entities::{ClientRecord, TenantRecord, UserRecord};
use iam_auth::shared::infrastructure::persistence::InMemoryDirectories;
use iam_auth::shared::domain::value_objects::RequestMeta;
use iam_auth::{AuthModule, Collaborators};
use warden_adapter_memory::MemoryCache;
use warden_common::UserId;
use warden_config::AppConfig;

pub const TENANT: &str = "t1";
pub const OTHER_TENANT: &str = "t2";
pub const CLIENT: &str = "c1";
pub const PASSWORD: &str = "secret123";
pub const ALICE: UserId = UserId(100);
pub const BOB: UserId = UserId(200);

pub struct TestApp {
    pub module: AuthModule,
    pub cache: MemoryCache,
    pub directories: InMemoryDirectories,
    pub audit: InMemoryAuditSink,
    pub config: AppConfig,
}

pub fn config() -> AppConfig {
    let mut config = AppConfig::default();
    config.login.max_retry_count = 3;
    config.login.lock_time_minutes = 10;
    config.captcha.enabled = false;
    config.register.enabled = true;
    config.welcome.enabled = false;
    config.audit.workers = 1;
    config
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(config())
}

pub fn spawn_app_with(config: AppConfig) -> TestApp {
    build_app(config, None)
}

/// Like [`spawn_app_with`], with `sink` receiving every audit record too.
pub fn spawn_app_with_sink(config: AppConfig, sink: Arc<dyn AuditSink>) -> TestApp {
    build_app(config, Some(sink))
}

fn build_app(config: AppConfig, extra_sink: Option<Arc<dyn AuditSink>>) -> TestApp {
    let cache = MemoryCache::new();
    let directories = InMemoryDirectories::new();
    let audit = InMemoryAuditSink::new();

    directories.tenants.insert(TenantRecord::new(TENANT, "Acme"));
    directories.tenants.insert(TenantRecord::new(OTHER_TENANT, "Globex"));

    let hash = PasswordService::hash_password(PASSWORD).expect("hash");
    directories.users.insert(
        UserRecord::new(ALICE, TENANT, "alice", hash.clone())
            .with_phonenumber("13800000000")
            .with_email("alice@acme.test"),
    );
    directories
        .users
        .insert(UserRecord::new(BOB, OTHER_TENANT, "bob", hash));

    directories.clients.insert(ClientRecord::new(
        CLIENT,
        "pc",
        &["password", "sms", "email"],
    ));
    directories
        .clients
        .insert(ClientRecord::new("mobile", "app", &["sms"]).with_device_type("android"));

    let mut sinks: Vec<Arc<dyn AuditSink>> = vec![Arc::new(LoggingAuditSink), Arc::new(audit.clone())];
    sinks.extend(extra_sink);
    let collaborators = Collaborators::in_memory(Arc::new(cache.clone()), &directories)
        .with_audit_sink(Arc::new(BroadcastAuditSink::new(sinks)));
    let module = AuthModule::build(&config, collaborators);

    TestApp {
        module,
        cache,
        directories,
        audit,
        config,
    }
}

pub fn request() -> RequestMeta {
    RequestMeta::new("10.0.0.8").with_user_agent("Mozilla/5.0 (Windows NT 10.0) Chrome/120.0")
}

pub fn password_body(tenant: &str, username: &str, password: &str) -> String {
    serde_json::json!({
        "clientId": CLIENT,
        "grantType": "password",
        "tenantId": tenant,
        "username": username,
        "password": password,
    })
    .to_string()
}

pub fn sessions_of(app: &TestApp, tenant: &str) -> Vec<String> {
    app.cache.keys_with_prefix(&format!("{tenant}:online_tokens:"))
}

/// Let spawned lifecycle work settle.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
