//! Grant-type strategies
//!
//! A strategy owns one way of proving identity. The registry maps the
//! `grantType` of a login request to exactly one strategy; there is no fallback.

mod email;
mod password;
mod sms;

pub use email::*;
pub use password::*;
pub use sms::*;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::auth::domain::entities::LoginResult;
use crate::error::AuthError;
use crate::shared::domain::entities::ClientRecord;
use crate::shared::domain::value_objects::RequestMeta;

pub const GRANT_PASSWORD: &str = "password";
pub const GRANT_SMS: &str = "sms";
pub const GRANT_EMAIL: &str = "email";

#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Authenticate from the raw request body and issue a token.
    async fn login(
        &self,
        body: &str,
        client: &ClientRecord,
        request: &RequestMeta,
    ) -> Result<LoginResult, AuthError>;
}

#[derive(Default)]
pub struct AuthStrategyRegistry {
    strategies: HashMap<String, Arc<dyn AuthStrategy>>,
}

impl AuthStrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, grant_type: impl Into<String>, strategy: Arc<dyn AuthStrategy>) {
        self.strategies.insert(grant_type.into(), strategy);
    }

    pub fn with(mut self, grant_type: impl Into<String>, strategy: Arc<dyn AuthStrategy>) -> Self {
        self.register(grant_type, strategy);
        self
    }

    pub fn grant_types(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub async fn login(
        &self,
        body: &str,
        client: &ClientRecord,
        request: &RequestMeta,
        grant_type: &str,
    ) -> Result<LoginResult, AuthError> {
        let strategy = self
            .strategies
            .get(grant_type)
            .ok_or_else(|| AuthError::UnknownGrantType(grant_type.to_string()))?;
        debug!(grant_type, client_id = %client.client_id, "Dispatching login");
        strategy.login(body, client, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use warden_common::{TenantId, UserId};

    struct CountingStrategy {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AuthStrategy for CountingStrategy {
        async fn login(
            &self,
            _body: &str,
            client: &ClientRecord,
            _request: &RequestMeta,
        ) -> Result<LoginResult, AuthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LoginResult {
                access_token: "tok".into(),
                expire_in: 60,
                client_id: client.client_id.clone(),
                tenant_id: TenantId::from("t1"),
                user_id: UserId(2),
            })
        }
    }

    #[tokio::test]
    async fn test_dispatch_by_grant_type() {
        let strategy = Arc::new(CountingStrategy {
            calls: AtomicUsize::new(0),
        });
        let registry = AuthStrategyRegistry::new().with(GRANT_PASSWORD, strategy.clone());
        let client = ClientRecord::new("c1", "pc", &["password", "social"]);
        let request = RequestMeta::new("127.0.0.1");

        let result = registry
            .login("{}", &client, &request, GRANT_PASSWORD)
            .await
            .unwrap();
        assert_eq!(result.client_id, "c1");

        let err = registry
            .login("{}", &client, &request, "social")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownGrantType(g) if g == "social"));
        assert_eq!(strategy.calls.load(Ordering::SeqCst), 1);
    }
}
