//! Self-service registration

use std::sync::Arc;

use tracing::{info, instrument};
use warden_common::{UserId, with_tenant};

use super::LoginService;
use crate::auth::application::commands::RegisterBody;
use crate::auth::domain::events::AuditKind;
use crate::auth::domain::services::PasswordService;
use crate::error::AuthError;
use crate::infrastructure::observability::metrics;
use crate::shared::domain::entities::NewUser;
use crate::shared::domain::repositories::UserDirectory;
use crate::shared::domain::value_objects::RequestMeta;

pub struct RegisterService {
    login: Arc<LoginService>,
    users: Arc<dyn UserDirectory>,
    enabled: bool,
}

impl RegisterService {
    pub fn new(login: Arc<LoginService>, users: Arc<dyn UserDirectory>, enabled: bool) -> Self {
        Self {
            login,
            users,
            enabled,
        }
    }

    #[instrument(skip(self, body, request), fields(username = %body.username))]
    pub async fn register(
        &self,
        body: RegisterBody,
        request: &RequestMeta,
    ) -> Result<UserId, AuthError> {
        if !self.enabled {
            return Err(AuthError::RegistrationDisabled);
        }
        body.validate()?;
        let tenant = self.login.check_tenant(body.tenant_id.as_deref()).await?;

        self.login
            .validate_captcha(
                &tenant,
                &body.username,
                body.code.as_deref(),
                body.uuid.as_deref(),
                request,
            )
            .await?;

        let exists = with_tenant(
            tenant.clone(),
            self.users.exists_username(&tenant, &body.username),
        )
        .await?;
        if exists {
            metrics::record_registration(false);
            return Err(AuthError::UserAlreadyExists(body.username));
        }

        let user = NewUser {
            tenant_id: tenant.clone(),
            username: body.username.clone(),
            nickname: body.username.clone(),
            user_type: body.user_type().to_string(),
            password_hash: PasswordService::hash_password(&body.password)?,
        };
        let user_id = self.users.register(user).await?;

        info!(tenant_id = %tenant, user_id = %user_id, "User registered");
        metrics::record_registration(true);
        self.login.record_login_info(
            &tenant,
            &body.username,
            AuditKind::Register,
            "Registration successful",
            request,
        );
        Ok(user_id)
    }
}
