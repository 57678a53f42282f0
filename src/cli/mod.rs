//! Command-line interface.

pub mod args;
pub mod build;
pub mod watch;

pub use args::{BuildArgs, Cli, Commands};
