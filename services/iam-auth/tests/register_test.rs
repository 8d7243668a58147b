//! Self-service registration

mod support;

use iam_auth::AuthError;
use iam_auth::auth::application::commands::RegisterBody;
use iam_auth::auth::domain::events::AuditKind;
use support::*;

fn body(username: &str) -> RegisterBody {
    RegisterBody {
        tenant_id: Some(TENANT.into()),
        username: username.into(),
        password: "newpass1".into(),
        user_type: None,
        code: None,
        uuid: None,
    }
}

#[tokio::test]
async fn test_registered_user_can_log_in() {
    let app = spawn_app();

    let user_id = app
        .module
        .register
        .register(body("carol"), &request())
        .await
        .expect("register");

    let result = app
        .module
        .auth
        .login(&password_body(TENANT, "carol", "newpass1"), &request())
        .await
        .expect("login");
    assert_eq!(result.user_id, user_id);

    app.module.shutdown().await;
    assert_eq!(app.audit.count_of(AuditKind::Register), 1);
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let app = spawn_app();
    let err = app
        .module
        .register
        .register(body("alice"), &request())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserAlreadyExists(ref name) if name == "alice"));
}

#[tokio::test]
async fn test_same_username_in_another_tenant_is_allowed() {
    let app = spawn_app();
    app.module
        .register
        .register(body("bob"), &request())
        .await
        .expect("bob is free in t1");
}

#[tokio::test]
async fn test_registration_can_be_disabled() {
    let mut config = config();
    config.register.enabled = false;
    let app = spawn_app_with(config);

    let err = app
        .module
        .register
        .register(body("carol"), &request())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::RegistrationDisabled));
}

#[tokio::test]
async fn test_unknown_user_type_is_invalid() {
    let app = spawn_app();
    let mut body = body("carol");
    body.user_type = Some("robot".into());
    let err = app
        .module
        .register
        .register(body, &request())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_register_checks_tenant() {
    let app = spawn_app();
    let mut body = body("carol");
    body.tenant_id = Some("nope".into());
    let err = app
        .module
        .register
        .register(body, &request())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::TenantNotFound(_)));
}
