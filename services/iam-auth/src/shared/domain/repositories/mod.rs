//! Directory ports
//!
//! Read access to records owned by other components. Implementations report
//! outages as `AppError::ExternalService`.

mod client_directory;
mod permission_directory;
mod tenant_directory;
mod user_directory;

pub use client_directory::*;
pub use permission_directory::*;
pub use tenant_directory::*;
pub use user_directory::*;
