//! Video duration calculator CLI library.
//!
//! This crate provides the CLI interface for the video duration calculator.

mod cli;
pub mod commands;
mod config;
pub mod console;

pub use cli::{Cli, Commands, PolicyArg};
pub use config::Config;
