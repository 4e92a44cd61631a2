//! Subcommand implementations for the `jm` binary.

pub mod generate;
