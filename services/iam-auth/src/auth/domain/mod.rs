pub mod cache_keys;
pub mod entities;
pub mod events;
pub mod login_type;
pub mod repositories;
pub mod services;
pub mod token;
