//! warden-config - configuration loading
//!
//! Layers, lowest precedence first: `default.toml`, `{APP_ENV}.toml`, then
//! `WARDEN_*` environment variables with `__` separating nested keys
//! (e.g. `WARDEN_LOGIN__MAX_RETRY_COUNT=3`).

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::Secret;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// Redis
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: Secret<String>,
    /// Per-command timeout; a slower reply counts as a cache outage.
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,
}

fn default_command_timeout_ms() -> u64 {
    500
}

fn default_connect_attempts() -> u32 {
    5
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: Secret::new("redis://127.0.0.1:6379".to_string()),
            command_timeout_ms: default_command_timeout_ms(),
            connect_attempts: default_connect_attempts(),
        }
    }
}

impl RedisConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// Telemetry
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit JSON log lines instead of the human readable format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
        }
    }
}

/// Multi-tenancy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TenantConfig {
    pub enabled: bool,
    pub default_tenant_id: String,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_tenant_id: "000000".to_string(),
        }
    }
}

/// Failed-login lockout
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// Failures that lock the account.
    pub max_retry_count: u32,
    pub lock_time_minutes: u64,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            max_retry_count: 5,
            lock_time_minutes: 10,
        }
    }
}

impl LoginConfig {
    pub fn lock_duration(&self) -> Duration {
        Duration::from_secs(self.lock_time_minutes * 60)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptchaConfig {
    pub enabled: bool,
    pub expire_secs: u64,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            expire_secs: 120,
        }
    }
}

impl CaptchaConfig {
    pub fn expiration(&self) -> Duration {
        Duration::from_secs(self.expire_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterConfig {
    pub enabled: bool,
}

/// Token issuance
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Lifetime in seconds, `-1` never expires. Clients may override it.
    pub timeout_secs: i64,
    /// Allow several live tokens per account and device type.
    pub is_concurrent: bool,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 86_400,
            is_concurrent: true,
        }
    }
}

/// Asynchronous login audit
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub queue_capacity: usize,
    pub workers: usize,
    pub sink_retry_attempts: u32,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            workers: 2,
            sink_retry_attempts: 3,
        }
    }
}

/// IP geolocation lookup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://ip-api.com/json".to_string(),
            timeout_ms: 1_500,
        }
    }
}

impl GeoConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Post-login welcome message
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WelcomeConfig {
    pub enabled: bool,
    pub delay_secs: u64,
    pub product_title: String,
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_secs: 5,
            product_title: "Warden Admin".to_string(),
        }
    }
}

impl WelcomeConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub tenant: TenantConfig,
    #[serde(default)]
    pub login: LoginConfig,
    #[serde(default)]
    pub captcha: CaptchaConfig,
    #[serde(default)]
    pub register: RegisterConfig,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub geo: GeoConfig,
    #[serde(default)]
    pub welcome: WelcomeConfig,
}

fn default_app_name() -> String {
    "warden".to_string()
}

fn default_app_env() -> String {
    "development".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            app_env: default_app_env(),
            redis: RedisConfig::default(),
            telemetry: TelemetryConfig::default(),
            tenant: TenantConfig::default(),
            login: LoginConfig::default(),
            captcha: CaptchaConfig::default(),
            register: RegisterConfig::default(),
            token: TokenConfig::default(),
            audit: AuditConfig::default(),
            geo: GeoConfig::default(),
            welcome: WelcomeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `config_dir` and the environment.
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env());

        Self::from_figment(
            Figment::new()
                .merge(Toml::file(format!("{config_dir}/default.toml")))
                .merge(Toml::file(format!("{config_dir}/{env}.toml")))
                .merge(Env::prefixed("WARDEN_").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        Ok(figment.extract()?)
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}
