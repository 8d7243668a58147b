//! Token framework contract
//!
//! Tokens are opaque bearer strings with server-side state. The framework reports
//! every state change of a token as one [`LifecycleEvent`] to a [`TokenListener`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use warden_common::{TenantId, UserId};
use warden_errors::AppResult;
use warden_ports::KeyTtl;

use crate::shared::domain::value_objects::{RequestMeta, TokenTimeout};

/// Per-token attributes recorded at login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenExtras {
    pub tenant_id: TenantId,
    pub user_id: UserId,
    pub username: String,
    pub client_id: String,
    pub client_key: String,
    pub device_type: String,
    pub dept_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginParameter {
    pub device_type: String,
    pub timeout: TokenTimeout,
    pub extras: TokenExtras,
    pub request: RequestMeta,
}

/// State of a token at the time an event fired.
#[derive(Debug, Clone)]
pub struct TokenContext {
    pub token: String,
    pub login_id: String,
    pub extras: TokenExtras,
    pub timeout: TokenTimeout,
    /// Deadline of the token as written by the event that raised this context.
    /// `None` when the token never expires or the event did not write it.
    pub expires_at: Option<Instant>,
    /// Only present for events raised on the originating request.
    pub request: Option<RequestMeta>,
}

impl TokenContext {
    /// Lifetime left on the token, rounded down to whole seconds.
    pub fn remaining_timeout(&self) -> TokenTimeout {
        match self.expires_at {
            Some(at) => TokenTimeout::Seconds(at.saturating_duration_since(Instant::now()).as_secs()),
            None => self.timeout,
        }
    }
}

#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    Login(TokenContext),
    Logout(TokenContext),
    /// Forced termination by an administrator.
    Kickout(TokenContext),
    /// Superseded by a newer login of the same account and device type.
    Replaced(TokenContext),
    Renewed {
        context: TokenContext,
        timeout: TokenTimeout,
    },
}

impl LifecycleEvent {
    pub fn context(&self) -> &TokenContext {
        match self {
            Self::Login(ctx) | Self::Logout(ctx) | Self::Kickout(ctx) | Self::Replaced(ctx) => ctx,
            Self::Renewed { context, .. } => context,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Logout(_) => "logout",
            Self::Kickout(_) => "kickout",
            Self::Replaced(_) => "replaced",
            Self::Renewed { .. } => "renewed",
        }
    }
}

#[async_trait]
pub trait TokenListener: Send + Sync {
    async fn on_event(&self, event: LifecycleEvent);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    /// Seconds, `-1` when the token never expires.
    pub expire_in: i64,
}

/// Issues and invalidates tokens.
///
/// `logout`, `kickout` and `renew` fail with `AppError::Unauthenticated` when the
/// token is unknown or already invalid.
#[async_trait]
pub trait TokenManager: Send + Sync {
    async fn login(&self, login_id: &str, parameter: LoginParameter) -> AppResult<IssuedToken>;

    async fn logout(&self, token: &str) -> AppResult<()>;

    async fn kickout(&self, token: &str) -> AppResult<()>;

    async fn renew(&self, token: &str, timeout: TokenTimeout) -> AppResult<()>;

    async fn extras(&self, token: &str) -> AppResult<Option<TokenExtras>>;

    async fn remaining(&self, token: &str) -> AppResult<KeyTtl>;
}
