//! Campus navigation CLI library.
//!
//! This crate provides the subcommand handlers and output formatting used by
//! the `campusnav-cli` binary.

pub mod commands;
pub mod output;
