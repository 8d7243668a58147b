//! Shared layer
//!
//! Records owned by other components, the directory ports used to read them and
//! request-scoped value objects.

pub mod domain;
pub mod infrastructure;
