mod login_result;
mod online_session;
mod session_principal;

pub use login_result::*;
pub use online_session::*;
pub use session_principal::*;
