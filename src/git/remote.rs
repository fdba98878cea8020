//! Git remote operations

use std::path::Path;
use std::time::Instant;
use tracing::debug;

use super::GitError;
use crate::util::{git_command, log_cmd};

/// Refspec that stores `branch` under `refs/remotes/<remote>/`, whatever
/// the remote's configured fetch refspec covers
fn tracking_refspec(remote: &str, branch: &str) -> String {
    format!("+refs/heads/{branch}:refs/remotes/{remote}/{branch}")
}

/// Fetch a single branch from a remote, updating `<remote>/<branch>`.
///
/// The refspec is explicit so single-branch clones get the tracking ref too.
pub fn fetch_branch(repo_path: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
    let start = Instant::now();

    let mut cmd = git_command(repo_path);
    cmd.args(["fetch", remote, &tracking_refspec(remote, branch)]);
    log_cmd(&cmd);
    let output = cmd
        .output()
        .map_err(|e| GitError::OperationFailed(e.to_string()))?;

    let success = output.status.success();
    debug!(
        remote,
        branch,
        success,
        duration_ms = start.elapsed().as_millis() as u64,
        "Git fetch complete"
    );

    if !success {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::OperationFailed(interpret_remote_error(&stderr)));
    }

    Ok(())
}

/// Push branch to remote
pub fn push_branch(
    repo_path: &Path,
    branch_name: &str,
    remote: &str,
    set_upstream: bool,
) -> Result<(), GitError> {
    let start = Instant::now();

    let mut args = vec!["push", remote, branch_name];
    if set_upstream {
        args.insert(1, "-u");
    }

    let mut cmd = git_command(repo_path);
    cmd.args(&args);
    log_cmd(&cmd);
    let output = cmd
        .output()
        .map_err(|e| GitError::OperationFailed(e.to_string()))?;

    let success = output.status.success();
    debug!(
        branch_name,
        remote,
        set_upstream,
        success,
        duration_ms = start.elapsed().as_millis() as u64,
        "Git push complete"
    );

    if !success {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitError::OperationFailed(interpret_remote_error(&stderr)));
    }

    Ok(())
}

/// Interpret common git push/fetch errors into user-friendly messages
fn interpret_remote_error(stderr: &str) -> String {
    let lower = stderr.to_lowercase();
    if lower.contains("couldn't find remote ref") {
        return format!(
            "Branch does not exist on the remote.\n(Original: {})",
            stderr.trim()
        );
    }
    if lower.contains("non-fast-forward") {
        return format!(
            "Push rejected: remote has changes the local branch lacks.\n(Original: {})",
            stderr.trim()
        );
    }
    if lower.contains("could not read from remote") || lower.contains("repository not found") {
        return format!(
            "Cannot reach remote. Check your network connection and repository URL.\n\
             (Original: {})",
            stderr.trim()
        );
    }
    if lower.contains("permission denied") || lower.contains("authentication failed") {
        return format!(
            "Authentication failed. Check your git credentials for this remote.\n\
             (Original: {})",
            stderr.trim()
        );
    }
    stderr.trim().to_string()
}
