//! CLI subcommands.

pub mod extract;
pub mod report;
pub mod run;
