//! CLI module for the planscope tool.
//!
//! This module provides the command-line interface for rendering plans.

mod commands;
mod output;

pub use commands::{Cli, Commands, InputArgs, OutputFormat};
pub use output::{ChangeCounts, OutputFormatter};
