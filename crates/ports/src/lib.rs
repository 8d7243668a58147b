//! ports - infrastructure abstractions
//!
//! Adapters in `crates/adapters/*` implement these traits.

mod cache;

pub use cache::*;
