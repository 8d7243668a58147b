//! Authentication module
//!
//! Login orchestration, grant-type strategies, lockout, token issuance and the
//! online-session lifecycle.

pub mod application;
pub mod domain;
pub mod infrastructure;
