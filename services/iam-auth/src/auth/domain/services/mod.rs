mod login_throttle;
mod password_service;
mod tenant_validator;

pub use login_throttle::*;
pub use password_service::*;
pub use tenant_validator::*;
