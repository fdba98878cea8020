//! The version-control seam used by the batch engine.
//!
//! Every mutation the engine performs on the working tree goes through
//! [`GitBackend`], so the pipeline can be driven against a real checkout
//! ([`GitRepo`]) or an in-memory fake in tests.

use std::path::{Path, PathBuf};

use super::cherry_pick::{self, CherryPickResult};
use super::{get_head_sha, history, open_repo, remote, GitError};

/// Version-control operations the batch pipeline depends on
pub trait GitBackend {
    /// Hash the checked-out branch currently points at
    fn head(&self) -> Result<String, GitError>;

    /// Literal message search; `rev` of `None` searches the current history
    fn find_commit_by_message(
        &self,
        rev: Option<&str>,
        message: &str,
    ) -> Result<Option<String>, GitError>;

    /// Apply one commit on top of the current tip
    fn cherry_pick(&self, sha: &str) -> CherryPickResult;

    fn stage_all(&self) -> Result<(), GitError>;

    fn cherry_pick_continue(&self) -> Result<(), GitError>;

    fn cherry_pick_skip(&self) -> Result<(), GitError>;

    fn cherry_pick_abort(&self) -> Result<(), GitError>;

    fn cherry_pick_in_progress(&self) -> bool;

    fn fetch_branch(&self, remote: &str, branch: &str) -> Result<(), GitError>;

    /// Run the operator's merge tool; blocks until it exits
    fn run_merge_tool(&self) -> Result<(), GitError>;

    fn reset_hard(&self, sha: &str) -> Result<(), GitError>;
}

/// A real checkout driven through the `git` CLI
#[derive(Debug, Clone)]
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Open the repository containing `path` and check `git` is on PATH
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GitError> {
        which::which("git").map_err(|_| GitError::GitNotInstalled)?;
        let path = path.as_ref();
        let repo = git2::Repository::discover(path)
            .map_err(|e| GitError::NotARepo(format!("{}: {}", path.display(), e)))?;
        let workdir = super::get_workdir(&repo).to_path_buf();
        Ok(Self { path: workdir })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GitBackend for GitRepo {
    fn head(&self) -> Result<String, GitError> {
        let repo = open_repo(&self.path)?;
        get_head_sha(&repo)
    }

    fn find_commit_by_message(
        &self,
        rev: Option<&str>,
        message: &str,
    ) -> Result<Option<String>, GitError> {
        history::find_commit_by_message(&self.path, rev, message)
    }

    fn cherry_pick(&self, sha: &str) -> CherryPickResult {
        cherry_pick::cherry_pick(&self.path, sha)
    }

    fn stage_all(&self) -> Result<(), GitError> {
        cherry_pick::stage_all(&self.path)
    }

    fn cherry_pick_continue(&self) -> Result<(), GitError> {
        cherry_pick::cherry_pick_continue(&self.path)
    }

    fn cherry_pick_skip(&self) -> Result<(), GitError> {
        cherry_pick::cherry_pick_skip(&self.path)
    }

    fn cherry_pick_abort(&self) -> Result<(), GitError> {
        cherry_pick::cherry_pick_abort(&self.path)
    }

    fn cherry_pick_in_progress(&self) -> bool {
        cherry_pick::cherry_pick_in_progress(&self.path)
    }

    fn fetch_branch(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        remote::fetch_branch(&self.path, remote, branch)
    }

    fn run_merge_tool(&self) -> Result<(), GitError> {
        cherry_pick::run_merge_tool(&self.path)
    }

    fn reset_hard(&self, sha: &str) -> Result<(), GitError> {
        history::reset_hard(&self.path, sha)
    }
}
