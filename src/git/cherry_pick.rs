//! Git cherry-pick operations

use crate::git::{command_failed, GitError};
use crate::util::{git_command, log_cmd};
use std::path::Path;
use std::process::Stdio;

/// Raw result of a single cherry-pick attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CherryPickResult {
    /// Commit was applied; carries the new tip hash
    Applied(String),
    /// git refused or stopped; carries its combined diagnostic output
    Failed(String),
}

/// Cherry-pick a commit onto the current branch.
///
/// Does not retry or prompt. Conflict reports go to stdout and the
/// "could not apply" line to stderr, so both are returned on failure.
pub fn cherry_pick(repo_path: &Path, commit_sha: &str) -> CherryPickResult {
    let mut cmd = git_command(repo_path);
    cmd.args(["cherry-pick", commit_sha]);
    log_cmd(&cmd);
    let output = match cmd.output() {
        Ok(o) => o,
        Err(e) => return CherryPickResult::Failed(format!("failed to run git cherry-pick: {}", e)),
    };

    if output.status.success() {
        return match rev_parse_head(repo_path) {
            Ok(sha) => CherryPickResult::Applied(sha),
            Err(e) => CherryPickResult::Failed(e.to_string()),
        };
    }

    let mut diagnostic = String::from_utf8_lossy(&output.stderr).to_string();
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        diagnostic.push('\n');
        diagnostic.push_str(stdout.trim_end());
    }
    CherryPickResult::Failed(diagnostic)
}

/// Read the current tip through the CLI, after a pick that just moved it
pub fn rev_parse_head(repo_path: &Path) -> Result<String, GitError> {
    let mut cmd = git_command(repo_path);
    cmd.args(["rev-parse", "HEAD"]);
    log_cmd(&cmd);
    let output = cmd.output()?;
    if !output.status.success() {
        return Err(command_failed("rev-parse HEAD", &output));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Stage every change in the working tree, resolved conflicts included
pub fn stage_all(repo_path: &Path) -> Result<(), GitError> {
    let mut cmd = git_command(repo_path);
    cmd.args(["add", "-A"]);
    log_cmd(&cmd);
    let output = cmd.output()?;
    if output.status.success() {
        Ok(())
    } else {
        Err(command_failed("add -A", &output))
    }
}

/// Continue an in-progress cherry-pick, keeping the original message
pub fn cherry_pick_continue(repo_path: &Path) -> Result<(), GitError> {
    let mut cmd = git_command(repo_path);
    cmd.args(["-c", "core.editor=true", "cherry-pick", "--continue"]);
    log_cmd(&cmd);
    let output = cmd
        .output()
        .map_err(|e| GitError::OperationFailed(format!("failed to continue cherry-pick: {}", e)))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(command_failed("cherry-pick --continue", &output))
    }
}

/// Drop the in-progress commit and move on
pub fn cherry_pick_skip(repo_path: &Path) -> Result<(), GitError> {
    let mut cmd = git_command(repo_path);
    cmd.args(["cherry-pick", "--skip"]);
    log_cmd(&cmd);
    let output = cmd
        .output()
        .map_err(|e| GitError::OperationFailed(format!("failed to skip cherry-pick: {}", e)))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(command_failed("cherry-pick --skip", &output))
    }
}

/// Abort an in-progress cherry-pick, restoring the pre-pick index and tree
pub fn cherry_pick_abort(repo_path: &Path) -> Result<(), GitError> {
    let mut cmd = git_command(repo_path);
    cmd.args(["cherry-pick", "--abort"]);
    log_cmd(&cmd);
    let output = cmd
        .output()
        .map_err(|e| GitError::OperationFailed(format!("failed to abort cherry-pick: {}", e)))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(command_failed("cherry-pick --abort", &output))
    }
}

/// Check if a cherry-pick is in progress
pub fn cherry_pick_in_progress(repo_path: &Path) -> bool {
    let mut cmd = git_command(repo_path);
    cmd.args(["rev-parse", "-q", "--verify", "CHERRY_PICK_HEAD"]);
    log_cmd(&cmd);
    cmd.output().map(|o| o.status.success()).unwrap_or(false)
}

/// Run the configured merge tool on the conflicted paths.
///
/// Inherits the terminal and blocks until the tool exits.
pub fn run_merge_tool(repo_path: &Path) -> Result<(), GitError> {
    let mut cmd = git_command(repo_path);
    cmd.arg("mergetool")
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    log_cmd(&cmd);
    let status = cmd
        .status()
        .map_err(|e| GitError::OperationFailed(format!("failed to run git mergetool: {}", e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(GitError::OperationFailed(format!(
            "git mergetool exited with {}",
            status
        )))
    }
}
