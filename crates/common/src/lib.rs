//! common - shared types, tenant context and retry helpers

pub mod retry;
pub mod tenant;
pub mod types;

pub use retry::*;
pub use tenant::{current_tenant, with_tenant};
pub use types::*;
