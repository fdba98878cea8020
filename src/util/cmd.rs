//! Command construction and logging for spawned git processes.

use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Build a `git` command rooted at `repo_path`.
///
/// `LC_ALL=C` keeps diagnostics in English so failure classification sees
/// the messages it matches on.
pub fn git_command(repo_path: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(repo_path).env("LC_ALL", "C");
    cmd
}

/// Log a command just before execution.
///
/// Emits a `tracing::debug!` event with the program name, arguments, and
/// working directory. Visible when running with `-vv` (which sets
/// `prpick=debug`) or via `RUST_LOG=prpick::cmd=debug`.
pub fn log_cmd(cmd: &Command) {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
    let cwd = cmd
        .get_current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    debug!(
        target: "prpick::cmd",
        %program,
        ?args,
        %cwd,
        "exec"
    );
}
