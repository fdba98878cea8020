//! Test fixtures for batch runs against real repositories.
//!
//! A `RepoFixture` is a bare `origin` plus a working clone that has `main`
//! and a `release` branch cut from the same base commit -- all offline.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use super::git_helpers;

/// A 40-character hash no repository will contain
pub const UNKNOWN_HASH: &str = "0badc0de0badc0de0badc0de0badc0de0badc0de";

/// A working clone with an `origin` remote, cleaned up on drop.
pub struct RepoFixture {
    /// Kept alive for the lifetime of the fixture.
    pub _temp: TempDir,
    /// The working clone the batch runs in.
    pub repo: PathBuf,
    /// Bare repository used as `origin`.
    pub remote: PathBuf,
    /// Hash of the commit `main` and `release` share.
    pub base: String,
}

impl RepoFixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let remote = temp.path().join("origin.git");
        git_helpers::init_bare_repo(&remote);
        let url = format!("file://{}", remote.display());

        let seed = temp.path().join("seed");
        git_helpers::init_repo(&seed);
        let base = git_helpers::commit_file(&seed, "shared.txt", "base\n", "Initial commit");
        git_helpers::add_remote(&seed, "origin", &url);
        git_helpers::push_branch(&seed, "origin", "main");

        let repo = temp.path().join("work");
        git_helpers::clone_repo(&url, &repo);
        git_helpers::create_branch(&repo, "release");
        git_helpers::checkout(&repo, "main");

        Self {
            _temp: temp,
            repo,
            remote,
            base,
        }
    }

    /// The file:// URL of `origin`.
    pub fn remote_url(&self) -> String {
        format!("file://{}", self.remote.display())
    }

    /// A second clone of `origin`, for commits the working clone has never seen.
    pub fn other_clone(&self, name: &str) -> PathBuf {
        let path = self._temp.path().join(name);
        git_helpers::clone_repo(&self.remote_url(), &path);
        path
    }

    /// Publish `branch` from the working clone, then clone only that branch.
    pub fn single_branch_clone(&self, name: &str, branch: &str) -> PathBuf {
        git_helpers::push_branch(&self.repo, "origin", branch);
        let path = self._temp.path().join(name);
        git_helpers::clone_single_branch(&self.remote_url(), &path, branch);
        path
    }

    /// Write a plan file next to the repositories and return its path.
    pub fn write_plan(&self, name: &str, plan: &serde_json::Value) -> PathBuf {
        let path = self._temp.path().join(name);
        fs::write(&path, serde_json::to_string_pretty(plan).unwrap()).unwrap();
        path
    }
}

/// Plan JSON for one commit entry.
pub fn commit_entry(hash: &str, message: &str) -> serde_json::Value {
    serde_json::json!({ "hash": hash, "message": message })
}

/// Plan JSON for one group.
pub fn group_entry(id: u64, title: &str, commits: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({ "id": id, "title": title, "author": "octocat", "commits": commits })
}
