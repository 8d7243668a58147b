//! warden-adapter-redis - Redis adapter

mod cache;
mod connection;

pub use cache::*;
pub use connection::*;
