mod auth_service;
mod login_service;
mod register_service;
mod welcome;

pub use auth_service::*;
pub use login_service::*;
pub use register_service::*;
pub use welcome::*;
