//! Online sessions follow the token lifecycle

mod support;

use iam_auth::auth::domain::events::AuditKind;
use iam_auth::auth::domain::services::PasswordService;
use iam_auth::shared::domain::entities::UserRecord;
use iam_auth::shared::domain::value_objects::TokenTimeout;
use support::*;
use warden_common::{TenantId, UserId, with_tenant};
use warden_ports::{CachePort, KeyTtl};

async fn login(app: &TestApp, tenant: &str, username: &str) -> String {
    app.module
        .auth
        .login(&password_body(tenant, username, PASSWORD), &request())
        .await
        .expect("login")
        .access_token
}

#[tokio::test]
async fn test_sessions_are_namespaced_per_tenant() {
    let app = spawn_app();
    let alice = login(&app, TENANT, "alice").await;
    let bob = login(&app, OTHER_TENANT, "bob").await;

    assert_eq!(sessions_of(&app, TENANT), vec![format!("t1:online_tokens:{alice}")]);
    assert_eq!(sessions_of(&app, OTHER_TENANT), vec![format!("t2:online_tokens:{bob}")]);

    // A tenant cannot read another tenant's session.
    let crossed = with_tenant(TenantId::from(TENANT), app.module.sessions.get(&bob))
        .await
        .unwrap();
    assert!(crossed.is_none());

    let own = with_tenant(TenantId::from(OTHER_TENANT), app.module.sessions.get(&bob))
        .await
        .unwrap()
        .expect("bob's session");
    assert_eq!(own.username, "bob");
    assert_eq!(own.ipaddr, "10.0.0.8");
    assert_eq!(own.browser, "Chrome 120");
    assert_eq!(own.device_type, "pc");
}

#[tokio::test]
async fn test_logout_removes_session_and_is_idempotent() {
    let app = spawn_app();
    let token = login(&app, TENANT, "alice").await;

    app.module.auth.logout(Some(&token), &request()).await.expect("logout");
    assert!(sessions_of(&app, TENANT).is_empty());
    assert!(app.module.tokens.extras(&token).await.unwrap().is_none());

    app.module
        .auth
        .logout(Some(&token), &request())
        .await
        .expect("second logout");
    app.module.auth.logout(None, &request()).await.expect("anonymous logout");
    app.module
        .auth
        .logout(Some("not-a-token"), &request())
        .await
        .expect("unknown token");

    app.module.shutdown().await;
    assert_eq!(app.audit.count_of(AuditKind::Logout), 1);
}

#[tokio::test]
async fn test_kickout_reports_whether_a_session_ended() {
    let app = spawn_app();
    let token = login(&app, TENANT, "alice").await;

    assert!(app.module.auth.kickout(&token).await.unwrap());
    assert!(sessions_of(&app, TENANT).is_empty());
    assert!(!app.module.auth.kickout(&token).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_logins_keep_every_session() {
    let app = spawn_app();
    let first = login(&app, TENANT, "alice").await;
    let second = login(&app, TENANT, "alice").await;

    assert_ne!(first, second);
    assert_eq!(sessions_of(&app, TENANT).len(), 2);
}

#[tokio::test]
async fn test_non_concurrent_login_replaces_previous_session() {
    let mut config = config();
    config.token.is_concurrent = false;
    let app = spawn_app_with(config);

    let first = login(&app, TENANT, "alice").await;
    let second = login(&app, TENANT, "alice").await;

    assert_eq!(sessions_of(&app, TENANT), vec![format!("t1:online_tokens:{second}")]);
    assert!(app.module.tokens.extras(&first).await.unwrap().is_none());
}

#[tokio::test]
async fn test_renew_extends_token_and_keeps_session() {
    let app = spawn_app();
    let token = login(&app, TENANT, "alice").await;

    app.module
        .tokens
        .renew(&token, TokenTimeout::Seconds(60))
        .await
        .expect("renew");

    match app.module.tokens.remaining(&token).await.unwrap() {
        KeyTtl::Expires(ttl) => assert!(ttl.as_secs() <= 60),
        other => panic!("unexpected ttl: {other:?}"),
    }
    assert_eq!(sessions_of(&app, TENANT).len(), 1);
}

#[tokio::test]
async fn test_token_lifetime_follows_client_or_default() {
    let app = spawn_app();
    let result = app
        .module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .unwrap();
    assert_eq!(result.expire_in, app.config.token.timeout_secs);
}

#[tokio::test]
async fn test_super_admin_tenant_switch_is_cleared_on_logout() {
    let app = spawn_app();
    let admin = UserRecord::new(
        UserId::SUPER_ADMIN,
        TENANT,
        "admin",
        PasswordService::hash_password(PASSWORD).unwrap(),
    );
    app.directories.users.insert(admin);

    let token = login(&app, TENANT, "admin").await;
    let acting = app
        .module
        .auth
        .act_as_tenant(UserId::SUPER_ADMIN, OTHER_TENANT)
        .await
        .unwrap();
    assert_eq!(acting, TenantId::from(OTHER_TENANT));

    app.module.auth.logout(Some(&token), &request()).await.unwrap();
    assert!(
        app.module
            .auth
            .acting_tenant(UserId::SUPER_ADMIN)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_only_super_admin_may_switch_tenant() {
    let app = spawn_app();
    assert!(app.module.auth.act_as_tenant(ALICE, OTHER_TENANT).await.is_err());
}

#[tokio::test]
async fn test_logout_during_cache_outage_still_succeeds() {
    let app = spawn_app();
    let token = login(&app, TENANT, "alice").await;

    app.cache.set_unavailable(true);
    let result = app.module.auth.logout(Some(&token), &request()).await;
    assert!(result.is_ok(), "logout surfaced {result:?}");

    // Once the cache is back the token can still be ended normally.
    app.cache.set_unavailable(false);
    app.module.auth.logout(Some(&token), &request()).await.unwrap();
    assert!(app.module.tokens.extras(&token).await.unwrap().is_none());
    assert!(sessions_of(&app, TENANT).is_empty());
}

#[tokio::test]
async fn test_session_never_outlives_its_token() {
    let app = spawn_app();
    let token = login(&app, TENANT, "alice").await;

    let token_ttl = match app.module.tokens.remaining(&token).await.unwrap() {
        KeyTtl::Expires(ttl) => ttl,
        other => panic!("unexpected token ttl: {other:?}"),
    };
    let session_key = format!("{TENANT}:online_tokens:{token}");
    let session_ttl = match app.cache.ttl(&session_key).await.unwrap() {
        KeyTtl::Expires(ttl) => ttl,
        other => panic!("unexpected session ttl: {other:?}"),
    };
    assert!(session_ttl < token_ttl, "{session_ttl:?} >= {token_ttl:?}");
}
