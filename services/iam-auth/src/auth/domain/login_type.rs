//! Credential kinds and their caller-facing failure wording

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginType {
    Password,
    Sms,
    Email,
}

impl LoginType {
    fn credential(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Sms => "SMS code",
            Self::Email => "email code",
        }
    }

    /// First failure, or when the remaining budget is still large.
    pub fn incorrect(&self) -> String {
        match self {
            Self::Password => "Incorrect account or password".to_string(),
            other => format!("Incorrect {}", other.credential()),
        }
    }

    pub fn retry_limit_count(&self, username: &str, attempts: u32, remaining: u32) -> String {
        format!(
            "Incorrect {} entered {} times for account {}, {} attempts left before lockout",
            self.credential(),
            attempts,
            username,
            remaining
        )
    }

    pub fn retry_limit_exceeded(&self, username: &str, max_attempts: u32, lock_minutes: u64) -> String {
        format!(
            "Incorrect {} entered {} times, account {} is locked for {} minutes",
            self.credential(),
            max_attempts,
            username,
            lock_minutes
        )
    }
}

impl fmt::Display for LoginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Password => "password",
            Self::Sms => "sms",
            Self::Email => "email",
        })
    }
}
