pub mod commands;
pub mod listeners;
pub mod services;
pub mod strategies;
