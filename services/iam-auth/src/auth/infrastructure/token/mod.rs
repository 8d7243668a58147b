mod cache_token_manager;

pub use cache_token_manager::*;
