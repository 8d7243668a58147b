//! Auth metrics
//!
//! Thin wrappers over the `metrics` macros so label sets stay consistent.

use metrics::{counter, gauge, histogram};
use std::time::Instant;

// ============================================================================
// Login
// ============================================================================

/// One login attempt through a grant type.
pub fn record_login_attempt(success: bool, grant_type: &str) {
    let labels = [
        ("success", success.to_string()),
        ("grant_type", grant_type.to_string()),
    ];

    counter!("warden_login_attempts_total", &labels).increment(1);

    if success {
        counter!("warden_login_success_total", &labels).increment(1);
    } else {
        counter!("warden_login_failure_total", &labels).increment(1);
    }
}

pub fn record_login_rejected(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!("warden_login_rejected_total", &labels).increment(1);
}

pub fn record_account_locked(login_type: &str) {
    let labels = [("login_type", login_type.to_string())];
    counter!("warden_account_locked_total", &labels).increment(1);
}

pub fn record_account_unlocked() {
    counter!("warden_account_unlocked_total").increment(1);
}

pub fn record_registration(success: bool) {
    let labels = [("success", success.to_string())];
    counter!("warden_registrations_total", &labels).increment(1);
}

// ============================================================================
// Sessions
// ============================================================================

pub fn record_session_created(device_type: &str) {
    let labels = [("device_type", device_type.to_string())];
    counter!("warden_sessions_created_total", &labels).increment(1);
}

/// `reason` is the lifecycle event that ended the session.
pub fn record_session_revoked(reason: &str) {
    let labels = [("reason", reason.to_string())];
    counter!("warden_sessions_revoked_total", &labels).increment(1);
}

pub fn record_session_hook_failure(event: &str) {
    let labels = [("event", event.to_string())];
    counter!("warden_session_hook_failures_total", &labels).increment(1);
}

/// Token store failures swallowed by logout.
pub fn record_logout_failure(stage: &str) {
    let labels = [("stage", stage.to_string())];
    counter!("warden_logout_failures_total", &labels).increment(1);
}

// ============================================================================
// Audit
// ============================================================================

pub fn record_audit_published(kind: &str) {
    let labels = [("kind", kind.to_string())];
    counter!("warden_audit_published_total", &labels).increment(1);
}

/// Queue was full and the event was handed to a waiting task.
pub fn record_audit_spilled() {
    counter!("warden_audit_spilled_total").increment(1);
}

pub fn record_audit_dropped() {
    counter!("warden_audit_dropped_total").increment(1);
}

pub fn record_audit_persisted(kind: &str) {
    let labels = [("kind", kind.to_string())];
    counter!("warden_audit_persisted_total", &labels).increment(1);
}

pub fn record_audit_failed(kind: &str) {
    let labels = [("kind", kind.to_string())];
    counter!("warden_audit_failed_total", &labels).increment(1);
}

pub fn set_audit_queue_depth(depth: usize) {
    gauge!("warden_audit_queue_depth").set(depth as f64);
}

// ============================================================================
// Timing
// ============================================================================

/// Records the elapsed time of an operation when dropped.
pub struct OperationTimer {
    operation: &'static str,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let labels = [("operation", self.operation.to_string())];
        histogram!("warden_auth_operation_duration_seconds", &labels)
            .record(self.start.elapsed().as_secs_f64());
    }
}
