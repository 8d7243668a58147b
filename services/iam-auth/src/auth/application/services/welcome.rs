//! Deferred welcome message after login

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, Timelike};
use tracing::{info, warn};
use warden_common::UserId;
use warden_config::WelcomeConfig;
use warden_errors::AppResult;

/// Pushes a short message to the user's open sessions.
#[async_trait]
pub trait WelcomeNotifier: Send + Sync {
    async fn notify(&self, user_ids: &[UserId], message: &str) -> AppResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct LoggingWelcomeNotifier;

#[async_trait]
impl WelcomeNotifier for LoggingWelcomeNotifier {
    async fn notify(&self, user_ids: &[UserId], message: &str) -> AppResult<()> {
        info!(?user_ids, message, "Welcome message");
        Ok(())
    }
}

/// Salutation for the hour of day (0-23).
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning",
        12..=13 => "Good noon",
        14..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

pub struct WelcomeScheduler {
    notifier: Arc<dyn WelcomeNotifier>,
    enabled: bool,
    delay: Duration,
    product_title: String,
}

impl WelcomeScheduler {
    pub fn new(notifier: Arc<dyn WelcomeNotifier>, config: &WelcomeConfig) -> Self {
        Self {
            notifier,
            enabled: config.enabled,
            delay: config.delay(),
            product_title: config.product_title.clone(),
        }
    }

    pub fn message_for_hour(&self, hour: u32) -> String {
        format!("{}, welcome to {}", greeting_for_hour(hour), self.product_title)
    }

    /// Fire and forget; failures are only logged.
    pub fn schedule(&self, user_id: UserId) {
        if !self.enabled {
            return;
        }
        let notifier = self.notifier.clone();
        let delay = self.delay;
        let message = self.message_for_hour(Local::now().hour());
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = notifier.notify(&[user_id], &message).await {
                warn!(user_id = %user_id, error = %e, "Failed to send welcome message");
            }
        });
    }
}
