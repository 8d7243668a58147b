//! Cross-cutting infrastructure

pub mod observability;
