//! End-to-end login through `AuthService`

mod support;

use std::time::Duration;

use iam_auth::AuthError;
use iam_auth::auth::domain::events::AuditKind;
use iam_auth::shared::domain::entities::{ClientRecord, RecordStatus};
use support::*;
use warden_common::TenantId;

#[tokio::test]
async fn test_password_login_opens_one_session_and_audits_once() {
    let app = spawn_app();

    let result = app
        .module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .expect("login");

    assert_eq!(result.tenant_id, TenantId::from(TENANT));
    assert_eq!(result.user_id, ALICE);
    assert_eq!(result.client_id, CLIENT);
    assert_eq!(
        sessions_of(&app, TENANT),
        vec![format!("{TENANT}:online_tokens:{}", result.access_token)]
    );

    app.module.shutdown().await;
    assert_eq!(app.audit.count_of(AuditKind::LoginSuccess), 1);
    let record = &app.audit.records()[0];
    assert_eq!(record.username, "alice");
    assert_eq!(record.ipaddr, "10.0.0.8");
    assert_eq!(record.client_key, "pc");
}

#[tokio::test]
async fn test_successful_login_records_last_login() {
    let app = spawn_app();
    app.module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .expect("login");

    let alice = app.directories.users.get(ALICE).expect("alice");
    assert_eq!(alice.login_ip.as_deref(), Some("10.0.0.8"));
    assert!(alice.login_date.is_some());
}

#[tokio::test]
async fn test_disabled_tenant_is_rejected_before_credentials() {
    let app = spawn_app();
    app.directories
        .tenants
        .set_status(&TenantId::from(TENANT), RecordStatus::Disabled);

    let err = app
        .module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::TenantDisabled(_)));
    assert!(sessions_of(&app, TENANT).is_empty());
    assert_eq!(
        app.module
            .login
            .failure_count(&TenantId::from(TENANT), "alice")
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn test_unknown_tenant_is_rejected() {
    let app = spawn_app();
    let err = app
        .module
        .auth
        .login(&password_body("nope", "alice", PASSWORD), &request())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TenantNotFound(_)));
}

#[tokio::test]
async fn test_lockout_after_max_failures_even_with_correct_password() {
    let app = spawn_app();
    let wrong = password_body(TENANT, "alice", "wrong-password");

    for attempt in 1..=2 {
        let err = app.module.auth.login(&wrong, &request()).await.unwrap_err();
        match err {
            AuthError::InvalidCredentials {
                attempts, remaining, ..
            } => {
                assert_eq!(attempts, attempt);
                assert_eq!(remaining, 3 - attempt);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    let err = app.module.auth.login(&wrong, &request()).await.unwrap_err();
    assert!(matches!(err, AuthError::LockedOut { max_attempts: 3, .. }));

    let err = app
        .module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::LockedOut { .. }));
    assert!(err.user_message().contains("10 minutes"));
    assert!(sessions_of(&app, TENANT).is_empty());

    app.module.shutdown().await;
    assert_eq!(app.audit.count_of(AuditKind::LoginFail), 4);
    assert_eq!(app.audit.count_of(AuditKind::LoginSuccess), 0);
}

#[tokio::test]
async fn test_unknown_user_counts_as_failure_with_same_message() {
    let app = spawn_app();

    let unknown = app
        .module
        .auth
        .login(&password_body(TENANT, "mallory", PASSWORD), &request())
        .await
        .unwrap_err();
    let wrong = app
        .module
        .auth
        .login(&password_body(TENANT, "alice", "wrong-password"), &request())
        .await
        .unwrap_err();

    assert_eq!(unknown.user_message(), wrong.user_message());
    assert_eq!(
        app.module
            .login
            .failure_count(&TenantId::from(TENANT), "mallory")
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_success_clears_failure_counter() {
    let app = spawn_app();
    let tenant = TenantId::from(TENANT);

    let _ = app
        .module
        .auth
        .login(&password_body(TENANT, "alice", "wrong-password"), &request())
        .await;
    assert_eq!(app.module.login.failure_count(&tenant, "alice").await.unwrap(), 1);

    app.module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .expect("login");
    assert_eq!(app.module.login.failure_count(&tenant, "alice").await.unwrap(), 0);
}

#[tokio::test]
async fn test_unlock_lifts_lockout() {
    let app = spawn_app();
    let tenant = TenantId::from(TENANT);
    for _ in 0..3 {
        let _ = app
            .module
            .auth
            .login(&password_body(TENANT, "alice", "wrong-password"), &request())
            .await;
    }

    app.module.auth.unlock(&tenant, "alice").await.expect("unlock");

    app.module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .expect("login after unlock");
}

#[tokio::test]
async fn test_disabled_user_is_rejected_after_password_check() {
    let app = spawn_app();
    let mut alice = app.directories.users.get(ALICE).expect("alice");
    alice.status = RecordStatus::Disabled;
    app.directories.users.insert(alice);

    let err = app
        .module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::UserDisabled(_)));
    assert!(sessions_of(&app, TENANT).is_empty());
    app.module.shutdown().await;
    assert_eq!(app.audit.count_of(AuditKind::LoginFail), 1);
}

#[tokio::test]
async fn test_grant_type_not_allowed_for_client() {
    let app = spawn_app();
    let body = serde_json::json!({
        "clientId": "mobile",
        "grantType": "password",
        "tenantId": TENANT,
        "username": "alice",
        "password": PASSWORD,
    })
    .to_string();

    let err = app.module.auth.login(&body, &request()).await.unwrap_err();
    assert!(matches!(err, AuthError::GrantTypeMismatch { .. }));
}

#[tokio::test]
async fn test_unknown_client_is_a_grant_type_mismatch() {
    let app = spawn_app();
    let body = serde_json::json!({
        "clientId": "ghost",
        "grantType": "password",
        "tenantId": TENANT,
    })
    .to_string();

    let err = app.module.auth.login(&body, &request()).await.unwrap_err();
    assert!(matches!(err, AuthError::GrantTypeMismatch { .. }));
}

#[tokio::test]
async fn test_blocked_client_is_rejected() {
    let app = spawn_app();
    app.directories.clients.insert(
        ClientRecord::new(CLIENT, "pc", &["password"])
            .with_status(RecordStatus::Disabled),
    );

    let err = app
        .module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::ClientBlocked(_)));
}

#[tokio::test]
async fn test_grant_type_without_strategy_is_unknown() {
    let app = spawn_app();
    app.directories.clients.insert(
        ClientRecord::new("social", "pc", &["social"]),
    );
    let body = serde_json::json!({
        "clientId": "social",
        "grantType": "social",
        "tenantId": TENANT,
    })
    .to_string();

    let err = app.module.auth.login(&body, &request()).await.unwrap_err();
    assert!(matches!(err, AuthError::UnknownGrantType(ref g) if g == "social"));
}

#[tokio::test]
async fn test_malformed_body_is_invalid_request() {
    let app = spawn_app();
    let err = app.module.auth.login("{not json", &request()).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_sms_login_consumes_code() {
    let app = spawn_app();
    let code = app.module.captcha.issue("13800000000").await.unwrap();
    let body = serde_json::json!({
        "clientId": CLIENT,
        "grantType": "sms",
        "tenantId": TENANT,
        "phonenumber": "13800000000",
        "smsCode": code,
    })
    .to_string();

    let result = app.module.auth.login(&body, &request()).await.expect("sms login");
    assert_eq!(result.user_id, ALICE);

    // Code is single use.
    let err = app.module.auth.login(&body, &request()).await.unwrap_err();
    assert!(matches!(err, AuthError::CaptchaExpired));
}

#[tokio::test]
async fn test_email_login_with_wrong_code_counts_failure() {
    let app = spawn_app();
    app.module
        .captcha
        .store("alice@acme.test", "135790", Duration::from_secs(120))
        .await
        .unwrap();
    let body = serde_json::json!({
        "clientId": CLIENT,
        "grantType": "email",
        "tenantId": TENANT,
        "email": "alice@acme.test",
        "emailCode": "000000",
    })
    .to_string();

    let err = app.module.auth.login(&body, &request()).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials { attempts: 1, .. }));
    assert_eq!(
        app.module
            .login
            .failure_count(&TenantId::from(TENANT), "alice")
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn test_captcha_required_when_enabled() {
    let mut config = config();
    config.captcha.enabled = true;
    let app = spawn_app_with(config);

    let err = app
        .module
        .auth
        .login(&password_body(TENANT, "alice", PASSWORD), &request())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::CaptchaExpired));

    app.module
        .captcha
        .store("cap-1", "AbCd", Duration::from_secs(60))
        .await
        .unwrap();
    let body = serde_json::json!({
        "clientId": CLIENT,
        "grantType": "password",
        "tenantId": TENANT,
        "username": "alice",
        "password": PASSWORD,
        "code": "abcd",
        "uuid": "cap-1",
    })
    .to_string();
    app.module.auth.login(&body, &request()).await.expect("login with captcha");
}
