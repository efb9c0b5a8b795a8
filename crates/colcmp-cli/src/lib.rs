//! CLI library components for colcmp.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
pub mod types;
