//! CLI command implementations

pub mod pick;
