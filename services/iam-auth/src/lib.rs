//! IAM Auth Service Library
//!
//! Multi-tenant authentication and session lifecycle:
//! - `shared`: user/tenant/client records, directory ports, request metadata, geo-IP
//! - `auth`: tenant validation, login throttling, grant-type strategies, tokens,
//!   online-session registry, lifecycle hooks and the asynchronous login audit
//! - `bootstrap`: wiring of the above from `AppConfig`

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod infrastructure;
pub mod shared;

pub use bootstrap::{AuthModule, Collaborators};
pub use error::AuthError;
