//! Request bodies
//!
//! Login bodies arrive as raw JSON; the envelope is parsed first to pick the
//! strategy, which then parses its own grant-specific body from the same text.

mod login_body;
mod register_body;

pub use login_body::*;
pub use register_body::*;

use serde::de::DeserializeOwned;

use crate::error::AuthError;

/// Parse a JSON body, reporting malformed input as [`AuthError::InvalidRequest`].
pub fn parse_body<T: DeserializeOwned>(raw: &str) -> Result<T, AuthError> {
    serde_json::from_str(raw).map_err(|e| AuthError::InvalidRequest(format!("Malformed request body: {}", e)))
}

fn require(value: &str, field: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::InvalidRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_length(value: &str, field: &str, min: usize, max: usize) -> Result<(), AuthError> {
    require(value, field)?;
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AuthError::InvalidRequest(format!(
            "{} must be between {} and {} characters",
            field, min, max
        )));
    }
    Ok(())
}
