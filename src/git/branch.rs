//! Git branch operations

use std::path::Path;

use super::{command_failed, GitError};
use crate::util::{git_command, log_cmd};

/// Create a new local branch at HEAD and check it out
pub fn create_and_checkout_branch(repo_path: &Path, branch_name: &str) -> Result<(), GitError> {
    let mut cmd = git_command(repo_path);
    cmd.args(["checkout", "-b", branch_name]);
    log_cmd(&cmd);
    let output = cmd
        .output()
        .map_err(|e| GitError::OperationFailed(e.to_string()))?;

    if !output.status.success() {
        return Err(command_failed("checkout -b", &output));
    }

    Ok(())
}

/// Checkout an existing branch
pub fn checkout_branch(repo_path: &Path, branch_name: &str) -> Result<(), GitError> {
    if !branch_exists(repo_path, branch_name) {
        return Err(GitError::BranchNotFound(branch_name.to_string()));
    }

    let mut cmd = git_command(repo_path);
    cmd.args(["checkout", branch_name]);
    log_cmd(&cmd);
    let output = cmd
        .output()
        .map_err(|e| GitError::OperationFailed(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("is already used by worktree at") {
            return Err(GitError::OperationFailed(format!(
                "Branch '{}' is already checked out in another worktree",
                branch_name
            )));
        }
        return Err(GitError::OperationFailed(stderr.trim().to_string()));
    }

    Ok(())
}

/// Check if a local branch exists
pub fn branch_exists(repo_path: &Path, branch_name: &str) -> bool {
    let mut cmd = git_command(repo_path);
    cmd.args([
        "rev-parse",
        "--verify",
        "--quiet",
        &format!("refs/heads/{}", branch_name),
    ]);
    log_cmd(&cmd);
    cmd.output().map(|o| o.status.success()).unwrap_or(false)
}

/// Force-delete a local branch that is not checked out
pub fn delete_local_branch(repo_path: &Path, branch_name: &str) -> Result<(), GitError> {
    let mut cmd = git_command(repo_path);
    cmd.args(["branch", "-D", branch_name]);
    log_cmd(&cmd);
    let output = cmd
        .output()
        .map_err(|e| GitError::OperationFailed(e.to_string()))?;

    if !output.status.success() {
        return Err(command_failed("branch -D", &output));
    }

    Ok(())
}
