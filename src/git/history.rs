//! History queries and resets

use crate::git::{command_failed, GitError};
use crate::util::{git_command, log_cmd};
use std::path::Path;

/// Find the newest commit reachable from `rev` (HEAD when `None`) whose
/// message contains `message` as a literal substring.
///
/// The text is passed with `--fixed-strings`, so regex metacharacters in a
/// commit subject (`[`, `(`, `*`, `.`) match themselves. An empty message
/// never matches.
pub fn find_commit_by_message(
    repo_path: &Path,
    rev: Option<&str>,
    message: &str,
) -> Result<Option<String>, GitError> {
    if message.is_empty() {
        return Ok(None);
    }

    let grep = format!("--grep={}", message);
    let mut cmd = git_command(repo_path);
    cmd.args(["log", "--fixed-strings", &grep, "--format=%H", "-n", "1"]);
    if let Some(rev) = rev {
        cmd.arg(rev);
    }
    cmd.arg("--");
    log_cmd(&cmd);
    let output = cmd.output()?;

    if !output.status.success() {
        return Err(command_failed("log --grep", &output));
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(if sha.is_empty() { None } else { Some(sha) })
}

/// Hard reset the checked-out branch to `target`
pub fn reset_hard(repo_path: &Path, target: &str) -> Result<(), GitError> {
    let mut cmd = git_command(repo_path);
    cmd.args(["reset", "--hard", target]);
    log_cmd(&cmd);
    let output = cmd.output()?;

    if output.status.success() {
        Ok(())
    } else {
        Err(command_failed("reset --hard", &output))
    }
}
