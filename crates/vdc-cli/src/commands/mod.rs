//! CLI subcommand implementations.

pub mod manual;
pub mod menu;
pub mod report;
pub mod scan;
