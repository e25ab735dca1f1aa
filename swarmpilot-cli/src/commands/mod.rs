//! Subcommand handlers

pub mod config;
pub mod generate;
pub mod run;
pub mod scenario;
