//! Git operations wrapper
//!
//! Mutating operations shell out to the `git` CLI (cherry-pick state,
//! merge tools and hooks behave exactly as the operator expects).
//! Repository discovery and tip reads use git2.

pub mod backend;
pub mod branch;
pub mod cherry_pick;
pub mod history;
pub mod remote;

pub use backend::{GitBackend, GitRepo};
pub use cherry_pick::CherryPickResult;

use git2::Repository;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during git operations
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Not a git repository: {0}")]
    NotARepo(String),

    #[error("Branch not found: {0}")]
    BranchNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Reference error: {0}")]
    Reference(String),

    #[error("git executable not found on PATH")]
    GitNotInstalled,
}

/// Open a git repository at the given path
pub fn open_repo<P: AsRef<Path>>(path: P) -> Result<Repository, GitError> {
    Repository::open(path.as_ref())
        .map_err(|e| GitError::NotARepo(format!("{}: {}", path.as_ref().display(), e)))
}

/// Get the working directory of a repository
/// Works correctly for both regular repos and worktrees
pub fn get_workdir(repo: &Repository) -> &Path {
    repo.workdir().unwrap_or_else(|| repo.path())
}

/// Get the current branch name
pub fn get_current_branch(repo: &Repository) -> Result<String, GitError> {
    let head = repo
        .head()
        .map_err(|e| GitError::Reference(e.to_string()))?;

    if head.is_branch() {
        let name = head.shorthand().unwrap_or("HEAD");
        Ok(name.to_string())
    } else {
        // Detached HEAD
        let oid = head
            .target()
            .ok_or_else(|| GitError::Reference("HEAD has no target".to_string()))?;
        Ok(format!("(HEAD detached at {})", &oid.to_string()[..7]))
    }
}

/// Get the full hash HEAD points at
pub fn get_head_sha(repo: &Repository) -> Result<String, GitError> {
    let head = repo
        .head()
        .map_err(|e| GitError::Reference(e.to_string()))?;
    let oid = head
        .target()
        .ok_or_else(|| GitError::Reference("HEAD has no target".to_string()))?;
    Ok(oid.to_string())
}

/// Turn a failed command's stderr into a `GitError`
pub(crate) fn command_failed(what: &str, output: &std::process::Output) -> GitError {
    let stderr = String::from_utf8_lossy(&output.stderr);
    GitError::OperationFailed(format!("{} failed: {}", what, stderr.trim()))
}
