use std::sync::Arc;

use async_trait::async_trait;
use warden_common::with_tenant;

use super::AuthStrategy;
use crate::auth::application::commands::{PasswordLoginBody, parse_body};
use crate::auth::application::services::LoginService;
use crate::auth::domain::entities::LoginResult;
use crate::auth::domain::login_type::LoginType;
use crate::auth::domain::services::PasswordService;
use crate::error::AuthError;
use crate::shared::domain::entities::ClientRecord;
use crate::shared::domain::repositories::UserDirectory;
use crate::shared::domain::value_objects::RequestMeta;

/// Username and password, optionally guarded by an image captcha.
pub struct PasswordAuthStrategy {
    login: Arc<LoginService>,
    users: Arc<dyn UserDirectory>,
}

impl PasswordAuthStrategy {
    pub fn new(login: Arc<LoginService>, users: Arc<dyn UserDirectory>) -> Self {
        Self { login, users }
    }
}

#[async_trait]
impl AuthStrategy for PasswordAuthStrategy {
    async fn login(
        &self,
        body: &str,
        client: &ClientRecord,
        request: &RequestMeta,
    ) -> Result<LoginResult, AuthError> {
        let body: PasswordLoginBody = parse_body(body)?;
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

        let user = with_tenant(
            tenant.clone(),
            self.users.find_by_username(&tenant, &body.username),
        )
        .await?;

        // Unknown accounts count as failures, with the same wording.
        let password = body.password.as_str();
        let hash = user.as_ref().map(|u| u.password_hash.as_str());
        self.login
            .check_login(LoginType::Password, &tenant, &body.username, request, async move {
                Ok(hash.is_none_or(|hash| !PasswordService::verify_password(password, hash)))
            })
            .await?;

        let user = user.ok_or_else(|| AuthError::InvalidRequest("Unknown account".into()))?;
        self.login.complete_login(user, client, request).await
    }
}
