//! Service error definitions

use thiserror::Error;
use warden_errors::AppError;

use crate::auth::domain::login_type::LoginType;

/// Failures of the login, logout and registration flows.
///
/// `Display` is for logs; callers get [`AuthError::user_message`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Tenant id is required")]
    TenantRequired,

    #[error("Tenant {0} not found")]
    TenantNotFound(String),

    #[error("Tenant {0} is disabled")]
    TenantDisabled(String),

    #[error("Tenant {0} has expired")]
    TenantExpired(String),

    #[error("Client {0} is blocked")]
    ClientBlocked(String),

    #[error("Client {client_id} does not allow grant type {grant_type}")]
    GrantTypeMismatch { client_id: String, grant_type: String },

    #[error("No strategy registered for grant type {0}")]
    UnknownGrantType(String),

    #[error("Account {username} locked after {max_attempts} {login_type} failures")]
    LockedOut {
        login_type: LoginType,
        username: String,
        max_attempts: u32,
        lock_minutes: u64,
    },

    #[error("Invalid {login_type} credentials for {username}, {attempts} failures")]
    InvalidCredentials {
        login_type: LoginType,
        username: String,
        attempts: u32,
        remaining: u32,
    },

    #[error("Account {0} is disabled")]
    UserDisabled(String),

    #[error("Captcha expired")]
    CaptchaExpired,

    #[error("Captcha mismatch")]
    CaptchaInvalid,

    #[error("Registration is disabled")]
    RegistrationDisabled,

    #[error("Account {0} already exists")]
    UserAlreadyExists(String),

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),
}

impl AuthError {
    /// Localized text safe to show to the caller.
    ///
    /// Unknown accounts and wrong credentials produce the same wording.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidRequest(msg) => msg.clone(),
            Self::TenantRequired => "Tenant id must not be empty".to_string(),
            Self::TenantNotFound(_) => "The selected tenant does not exist".to_string(),
            Self::TenantDisabled(_) => {
                "The selected tenant is disabled, contact the administrator".to_string()
            }
            Self::TenantExpired(_) => {
                "The selected tenant has expired, contact the administrator".to_string()
            }
            Self::ClientBlocked(_) => "The client is blocked, contact the administrator".to_string(),
            Self::GrantTypeMismatch { .. } | Self::UnknownGrantType(_) => {
                "Unsupported grant type".to_string()
            }
            Self::LockedOut {
                login_type,
                username,
                max_attempts,
                lock_minutes,
            } => login_type.retry_limit_exceeded(username, *max_attempts, *lock_minutes),
            Self::InvalidCredentials {
                login_type,
                username,
                attempts,
                remaining,
            } => {
                if *attempts <= 1 {
                    login_type.incorrect()
                } else {
                    login_type.retry_limit_count(username, *attempts, *remaining)
                }
            }
            Self::UserDisabled(username) => {
                format!("Account {} is disabled, contact the administrator", username)
            }
            Self::CaptchaExpired => "Captcha expired".to_string(),
            Self::CaptchaInvalid => "Captcha is incorrect".to_string(),
            Self::RegistrationDisabled => "Registration is not enabled".to_string(),
            Self::UserAlreadyExists(username) => {
                format!("Account {} already exists", username)
            }
            Self::DependencyUnavailable(_) => {
                "Service temporarily unavailable, try again later".to_string()
            }
        }
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(msg) => AuthError::InvalidRequest(msg),
            other => AuthError::DependencyUnavailable(other.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let message = err.user_message();
        match err {
            AuthError::InvalidRequest(_)
            | AuthError::TenantRequired
            | AuthError::GrantTypeMismatch { .. }
            | AuthError::UnknownGrantType(_) => AppError::validation(message),
            AuthError::TenantNotFound(_)
            | AuthError::TenantDisabled(_)
            | AuthError::TenantExpired(_)
            | AuthError::ClientBlocked(_)
            | AuthError::UserDisabled(_)
            | AuthError::RegistrationDisabled => AppError::forbidden(message),
            AuthError::LockedOut { .. } => AppError::resource_exhausted(message),
            AuthError::InvalidCredentials { .. }
            | AuthError::CaptchaExpired
            | AuthError::CaptchaInvalid => AppError::unauthenticated(message),
            AuthError::UserAlreadyExists(_) => AppError::conflict(message),
            AuthError::DependencyUnavailable(_) => AppError::external_service(message),
        }
    }
}
