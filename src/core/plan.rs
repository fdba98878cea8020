//! Batch plan files
//!
//! A plan is the ordered list of groups (with their ordered commits) that a
//! run should re-apply. Selection and retrieval happen elsewhere; the plan
//! arrives already ordered and is consumed as-is.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::types::Group;

/// Errors that can occur when loading a batch plan
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Failed to read plan file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse plan JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse plan YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Shortest abbreviated hash git accepts
const MIN_HASH_LEN: usize = 4;
/// Full SHA-256 object name
const MAX_HASH_LEN: usize = 64;

/// A plan hash is an (optionally abbreviated) hex object name. Anything
/// else, options like `-n` in particular, never reaches git.
fn is_commit_hash(hash: &str) -> bool {
    (MIN_HASH_LEN..=MAX_HASH_LEN).contains(&hash.len())
        && hash.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Ordered groups to process in one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPlan {
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl BatchPlan {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// Load a plan, choosing YAML for `.yaml`/`.yml` files and JSON otherwise
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::parse_yaml(&content)
        } else {
            Self::parse_json(&content)
        }
    }

    pub fn parse_json(json: &str) -> Result<Self, PlanError> {
        let plan: BatchPlan = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn parse_yaml(yaml: &str) -> Result<Self, PlanError> {
        let plan: BatchPlan = serde_yaml::from_str(yaml)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Validate the plan
    pub fn validate(&self) -> Result<(), PlanError> {
        for group in &self.groups {
            for (index, commit) in group.commits.iter().enumerate() {
                if commit.hash.trim().is_empty() {
                    return Err(PlanError::ValidationError(format!(
                        "Group #{} commit {} has an empty hash",
                        group.id,
                        index + 1
                    )));
                }
                if !is_commit_hash(&commit.hash) {
                    return Err(PlanError::ValidationError(format!(
                        "Group #{} commit {} has invalid hash '{}' (expected {}-{} hex digits)",
                        group.id,
                        index + 1,
                        commit.hash,
                        MIN_HASH_LEN,
                        MAX_HASH_LEN
                    )));
                }
            }
        }
        Ok(())
    }

    /// Total number of commits across all groups
    pub fn commit_count(&self) -> usize {
        self.groups.iter().map(|g| g.commits.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.commit_count() == 0
    }
}
