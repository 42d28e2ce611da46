//! CLI subcommands.

pub mod assemble;
pub mod common;
pub mod config;
pub mod estimate;
pub mod probe;
pub mod profile;
