//! warden-adapter-memory - in-process cache for development and tests

mod cache;

pub use cache::*;
