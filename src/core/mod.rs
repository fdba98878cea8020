//! Core data: commits and groups, batch plans, profile configuration

pub mod config;
pub mod plan;
pub mod types;

pub use config::{ConfigError, Profile, ProfileConfig, ProfileFile, CONFIG_FILE_NAME};
pub use plan::{BatchPlan, PlanError};
pub use types::{Commit, Group};
