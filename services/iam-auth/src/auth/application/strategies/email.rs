use std::sync::Arc;

use async_trait::async_trait;
use warden_common::with_tenant;

use super::AuthStrategy;
use crate::auth::application::commands::{EmailLoginBody, parse_body};
use crate::auth::application::services::LoginService;
use crate::auth::domain::entities::LoginResult;
use crate::auth::domain::login_type::LoginType;
use crate::error::AuthError;
use crate::shared::domain::entities::ClientRecord;
use crate::shared::domain::repositories::UserDirectory;
use crate::shared::domain::value_objects::RequestMeta;

/// Email address plus a one-time code previously sent by mail.
pub struct EmailAuthStrategy {
    login: Arc<LoginService>,
    users: Arc<dyn UserDirectory>,
}

impl EmailAuthStrategy {
    pub fn new(login: Arc<LoginService>, users: Arc<dyn UserDirectory>) -> Self {
        Self { login, users }
    }
}

#[async_trait]
impl AuthStrategy for EmailAuthStrategy {
    async fn login(
        &self,
        body: &str,
        client: &ClientRecord,
        request: &RequestMeta,
    ) -> Result<LoginResult, AuthError> {
        let body: EmailLoginBody = parse_body(body)?;
        body.validate()?;
        let tenant = self.login.check_tenant(body.tenant_id.as_deref()).await?;

        let user = with_tenant(tenant.clone(), self.users.find_by_email(&tenant, &body.email)).await?;
        let account = user
            .as_ref()
            .map_or(body.email.clone(), |u| u.username.clone());

        let known = user.is_some();
        let login = self.login.as_ref();
        let (tenant_ref, account_ref) = (&tenant, account.as_str());
        self.login
            .check_login(LoginType::Email, &tenant, &account, request, async move {
                let matched = login
                    .verify_one_time_code(tenant_ref, account_ref, &body.email, &body.email_code, request)
                    .await?;
                Ok(!(known && matched))
            })
            .await?;

        let user = user.ok_or_else(|| AuthError::InvalidRequest("Unknown account".into()))?;
        self.login.complete_login(user, client, request).await
    }
}
