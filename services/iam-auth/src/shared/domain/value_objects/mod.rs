mod request_meta;
mod token_timeout;
mod user_agent;

pub use request_meta::*;
pub use token_timeout::*;
pub use user_agent::*;
