pub mod geo;
pub mod persistence;
