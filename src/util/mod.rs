//! Utility functions and helpers

pub mod cmd;

pub use cmd::{git_command, log_cmd};
