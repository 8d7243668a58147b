//! Cache-backed session state, token storage and the audit pipeline

pub mod cache;
pub mod events;
pub mod token;
