//! Work logger CLI library.
//!
//! This crate provides the CLI interface for the work logger.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, DayArgs};
pub use config::Config;
