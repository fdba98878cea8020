//! Profile configuration
//!
//! The profile file (`.prpick.yaml`) holds named sets of defaults so a
//! recurring backport run can be started with `--profile <name>`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".prpick.yaml";

/// Errors that can occur when loading or validating the profile file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("No {CONFIG_FILE_NAME} found in {0} or any parent directory")]
    NotFound(String),

    #[error("Profile '{0}' not found in config file")]
    ProfileNotFound(String),
}

/// Settings carried by a profile. Every field is optional on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Branch that receives the picks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    /// Branch the groups were merged into
    #[serde(default = "default_source_branch")]
    pub source_branch: String,
    #[serde(default = "default_remote")]
    pub remote: String,
    #[serde(default)]
    pub fail_on_conflict: bool,
    #[serde(default)]
    pub merge_tool: bool,
    /// Pick onto a fresh branch for a pull request instead of the target itself
    #[serde(default)]
    pub create_branch: bool,
    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,
    #[serde(default = "default_emoji")]
    pub emoji: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_body_template: Option<String>,
}

fn default_source_branch() -> String {
    "main".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch_prefix() -> String {
    "prpick".to_string()
}

fn default_emoji() -> String {
    "🍒".to_string()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            target_branch: None,
            source_branch: default_source_branch(),
            remote: default_remote(),
            fail_on_conflict: false,
            merge_tool: false,
            create_branch: false,
            branch_prefix: default_branch_prefix(),
            emoji: default_emoji(),
            owner: None,
            repo: None,
            pr_title: None,
            pr_body_template: None,
        }
    }
}

/// A named profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub configuration: ProfileConfig,
}

/// Contents of a `.prpick.yaml` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileFile {
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl ProfileFile {
    /// Load the profile file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse the profile file from a YAML string
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let file: ProfileFile = serde_yaml::from_str(yaml)?;
        file.validate()?;
        Ok(file)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for profile in &self.profiles {
            if profile.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Profile name must not be empty".to_string(),
                ));
            }
            if !seen.insert(profile.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate profile name '{}'",
                    profile.name
                )));
            }
            if profile.configuration.branch_prefix.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "Profile '{}' has an empty branch_prefix",
                    profile.name
                )));
            }
        }
        Ok(())
    }

    /// Find the profile file by searching `start` and its parent directories
    pub fn find_in_ancestors(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return None,
            }
        }
    }

    /// Discover and load the profile file starting at `start`
    pub fn discover(start: &Path) -> Result<(PathBuf, Self), ConfigError> {
        let path = Self::find_in_ancestors(start)
            .ok_or_else(|| ConfigError::NotFound(start.display().to_string()))?;
        let file = Self::load(&path)?;
        Ok((path, file))
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<&ProfileConfig, ConfigError> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.configuration)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }
}
