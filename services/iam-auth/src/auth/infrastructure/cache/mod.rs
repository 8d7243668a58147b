mod captcha_store;
mod dynamic_tenant_store;
mod session_registry;

pub use captcha_store::*;
pub use dynamic_tenant_store::*;
pub use session_registry::*;
