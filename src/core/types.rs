//! Commits and groups handed to the batch engine.

use serde::{Deserialize, Serialize};

/// A commit to re-apply on the target branch.
///
/// Sourced externally and never mutated during a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full object hash in the source history
    pub hash: String,
    /// Full commit message; only the first line is used for matching
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Commit {
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            message: message.into(),
            author: None,
        }
    }

    /// First line of the message, trimmed
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }

    /// Abbreviated hash for display
    pub fn short_hash(&self) -> &str {
        short_hash(&self.hash)
    }
}

/// A batch-level unit (typically a pull request) bundling ordered commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Identifier, e.g. the pull request number
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Branch the group's commits were merged into; used to recover
    /// commits that are missing locally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<String>,
    #[serde(default)]
    pub commits: Vec<Commit>,
}

impl Group {
    pub fn new(id: u64, title: impl Into<String>, commits: Vec<Commit>) -> Self {
        Self {
            id,
            title: title.into(),
            author: None,
            source_branch: None,
            commits,
        }
    }
}

/// Abbreviate a hash to seven characters.
pub fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}
