//! Command-line interface
//!
//! Argument parsing, command dispatch and shutdown signalling for the
//! `workout-clock` binary.

pub mod args;
pub mod commands;
pub mod shutdown;

pub use shutdown::Shutdown;
