//! Lockout expiry and behavior while the cache is down

mod support;

use std::time::Duration;

use iam_auth::AuthError;
use support::*;
use warden_common::TenantId;

async fn fail_until_locked(app: &TestApp) {
    for _ in 0..3 {
        let _ = app
            .module
            .auth
            .login(&password_body(TENANT, "alice", "wrong-password"), &request())
            .await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_lock_expires_after_lock_time() {
    let app = spawn_app();
    fail_until_locked(&app).await;

    tokio::time::advance(Duration::from_secs(9 * 60)).await;
    let err = app
        .module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::LockedOut { .. }));

    tokio::time::advance(Duration::from_secs(61)).await;
    app.module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .expect("login after lock expiry");
}

#[tokio::test(start_paused = true)]
async fn test_remaining_lock_counts_down() {
    let app = spawn_app();
    let tenant = TenantId::from(TENANT);
    assert_eq!(app.module.login.lock_remaining(&tenant, "alice").await.unwrap(), None);

    fail_until_locked(&app).await;
    tokio::time::advance(Duration::from_secs(4 * 60)).await;

    let left = app
        .module
        .login
        .lock_remaining(&tenant, "alice")
        .await
        .unwrap()
        .expect("locked");
    assert!(left <= Duration::from_secs(6 * 60));
    assert!(left > Duration::from_secs(5 * 60));
}

#[tokio::test(start_paused = true)]
async fn test_each_failure_refreshes_the_window() {
    let app = spawn_app();
    let tenant = TenantId::from(TENANT);
    let wrong = password_body(TENANT, "alice", "wrong-password");

    let _ = app.module.auth.login(&wrong, &request()).await;
    tokio::time::advance(Duration::from_secs(8 * 60)).await;
    let _ = app.module.auth.login(&wrong, &request()).await;
    tokio::time::advance(Duration::from_secs(8 * 60)).await;

    assert_eq!(app.module.login.failure_count(&tenant, "alice").await.unwrap(), 2);
}

#[tokio::test]
async fn test_lockout_is_per_tenant() {
    let app = spawn_app();
    for _ in 0..3 {
        let _ = app
            .module
            .auth
            .login(&password_body(TENANT, "bob", "wrong-password"), &request())
            .await;
    }

    // bob lives in t2; the t1 counter for the same name does not apply there.
    app.module
        .auth
        .login(&password_body(OTHER_TENANT, "bob", PASSWORD), &request())
        .await
        .expect("login in the account's own tenant");
}

#[tokio::test]
async fn test_cache_outage_fails_closed() {
    let app = spawn_app();
    app.cache.set_unavailable(true);

    let err = app
        .module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::DependencyUnavailable(_)));
    app.cache.set_unavailable(false);
    assert!(sessions_of(&app, TENANT).is_empty());
}

#[tokio::test]
async fn test_tenant_directory_outage_fails_closed() {
    let app = spawn_app();
    app.directories.tenants.set_unavailable(true);

    let err = app
        .module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::DependencyUnavailable(_)));
}
