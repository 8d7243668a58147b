//! Directory implementations
//!
//! The relational store lives in other components; these in-memory directories
//! back development setups and tests.

mod in_memory;

pub use in_memory::*;
