//! CLI module for libris - command-line interface and subcommands.
//!
//! Each invocation opens the catalog, runs one operation and exits.

pub mod commands;

pub use commands::Cli;
