//! Conflict resolution strategies.
//!
//! A strategy takes over once a pick has stopped on a conflict and ends in
//! exactly one [`Resolution`]. The strategy is chosen once per run.

use serde::Serialize;
use std::fmt;
use std::io;
use tracing::warn;

use super::report::{emit, BatchEvent, BatchReporter};
use super::state::AppliedVia;
use crate::core::types::Commit;
use crate::git::{GitBackend, GitError};

/// Which strategy a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Ask the operator: continue, skip or abort
    Manual,
    /// Open the merge tool, then fall back to asking
    MergeTool,
    /// Abort the whole batch on the first conflict
    FailFast,
}

impl StrategyKind {
    /// `fail_on_conflict` wins over `merge_tool`; neither means Manual
    pub fn from_flags(fail_on_conflict: bool, merge_tool: bool) -> Self {
        if fail_on_conflict {
            StrategyKind::FailFast
        } else if merge_tool {
            StrategyKind::MergeTool
        } else {
            StrategyKind::Manual
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Manual => write!(f, "manual"),
            StrategyKind::MergeTool => write!(f, "merge-tool"),
            StrategyKind::FailFast => write!(f, "fail-fast"),
        }
    }
}

/// The conflict a strategy is asked to resolve
#[derive(Debug, Clone, Copy)]
pub struct Conflict<'a> {
    pub commit: &'a Commit,
    /// Hash that was actually picked
    pub picked_hash: &'a str,
    /// git's diagnostic output for the failed pick
    pub diagnostic: &'a str,
}

/// How a conflict ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved { new_hash: String, via: AppliedVia },
    Skipped,
    Aborted,
    /// The operator interrupted the prompt; the pick is left as it is
    Interrupted,
}

/// A conflict handler
pub trait ResolutionStrategy {
    fn kind(&self) -> StrategyKind;

    /// Bring the in-progress pick to an end. Must not leave a pick in
    /// progress unless the result is `Resolved` or `Interrupted`.
    fn resolve(
        &mut self,
        git: &dyn GitBackend,
        conflict: &Conflict<'_>,
        reporter: &mut dyn BatchReporter,
    ) -> Resolution;
}

/// Source of the operator's answer for the manual strategy
pub trait OperatorPrompt {
    /// Block until the operator answers; returns the raw input.
    ///
    /// An error of kind [`io::ErrorKind::Interrupted`] means the operator
    /// pressed Ctrl-C at the prompt.
    fn ask(&mut self, conflict: &Conflict<'_>) -> io::Result<String>;
}

/// The three answers the manual strategy understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualChoice {
    /// Stage everything and complete the pick
    Continue,
    /// Drop this commit only
    Skip,
    /// Drop this commit and stop the batch
    Abort,
}

impl ManualChoice {
    /// Anything unrecognized is an abort
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" | "c" | "continue" => ManualChoice::Continue,
            "s" | "skip" => ManualChoice::Skip,
            _ => ManualChoice::Abort,
        }
    }
}

/// Stage all changes, finish the pick and return the new tip
fn complete_pick(git: &dyn GitBackend) -> Result<String, GitError> {
    git.stage_all()?;
    git.cherry_pick_continue()?;
    git.head()
}

/// Throw away the in-progress pick, restoring the pre-pick index
fn abandon_pick(git: &dyn GitBackend) {
    if !git.cherry_pick_in_progress() {
        return;
    }
    if let Err(e) = git.cherry_pick_abort() {
        warn!(error = %e, "Failed to abort cherry-pick");
    }
}

/// Abort on the first conflict without prompting
#[derive(Debug, Default)]
pub struct FailFast;

impl ResolutionStrategy for FailFast {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FailFast
    }

    fn resolve(
        &mut self,
        git: &dyn GitBackend,
        _conflict: &Conflict<'_>,
        _reporter: &mut dyn BatchReporter,
    ) -> Resolution {
        abandon_pick(git);
        Resolution::Aborted
    }
}

/// Ask the operator and act on the answer
#[derive(Debug)]
pub struct Manual<P> {
    prompt: P,
}

impl<P: OperatorPrompt> Manual<P> {
    pub fn new(prompt: P) -> Self {
        Self { prompt }
    }
}

impl<P: OperatorPrompt> ResolutionStrategy for Manual<P> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Manual
    }

    fn resolve(
        &mut self,
        git: &dyn GitBackend,
        conflict: &Conflict<'_>,
        _reporter: &mut dyn BatchReporter,
    ) -> Resolution {
        loop {
            let input = match self.prompt.ask(conflict) {
                Ok(input) => input,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                    return Resolution::Interrupted;
                }
                Err(e) => {
                    // Closed stdin and the like count as an abort
                    warn!(error = %e, "Could not read operator input");
                    String::new()
                }
            };

            match ManualChoice::parse(&input) {
                ManualChoice::Continue => match complete_pick(git) {
                    Ok(new_hash) => {
                        return Resolution::Resolved {
                            new_hash,
                            via: AppliedVia::Manual,
                        }
                    }
                    Err(e) => {
                        // The pick is still in progress; ask again
                        warn!(error = %e, "Could not complete cherry-pick, conflicts may remain");
                    }
                },
                ManualChoice::Skip => {
                    if let Err(e) = git.cherry_pick_skip() {
                        warn!(error = %e, "cherry-pick --skip failed, aborting the pick instead");
                        abandon_pick(git);
                    }
                    return Resolution::Skipped;
                }
                ManualChoice::Abort => {
                    abandon_pick(git);
                    return Resolution::Aborted;
                }
            }
        }
    }
}

/// Resolve in the operator's merge tool, falling back to [`Manual`]
#[derive(Debug)]
pub struct MergeTool<P> {
    fallback: Manual<P>,
}

impl<P: OperatorPrompt> MergeTool<P> {
    pub fn new(prompt: P) -> Self {
        Self {
            fallback: Manual::new(prompt),
        }
    }
}

impl<P: OperatorPrompt> ResolutionStrategy for MergeTool<P> {
    fn kind(&self) -> StrategyKind {
        StrategyKind::MergeTool
    }

    fn resolve(
        &mut self,
        git: &dyn GitBackend,
        conflict: &Conflict<'_>,
        reporter: &mut dyn BatchReporter,
    ) -> Resolution {
        let attempt = git.run_merge_tool().and_then(|()| complete_pick(git));
        match attempt {
            Ok(new_hash) => Resolution::Resolved {
                new_hash,
                via: AppliedVia::MergeTool,
            },
            Err(e) => {
                emit(
                    reporter,
                    BatchEvent::MergeToolFailed {
                        hash: conflict.picked_hash.to_string(),
                        detail: e.to_string(),
                    },
                );
                self.fallback.resolve(git, conflict, reporter)
            }
        }
    }
}

/// Build the strategy for a run
pub fn build_strategy<P: OperatorPrompt + 'static>(
    kind: StrategyKind,
    prompt: P,
) -> Box<dyn ResolutionStrategy> {
    match kind {
        StrategyKind::Manual => Box::new(Manual::new(prompt)),
        StrategyKind::MergeTool => Box::new(MergeTool::new(prompt)),
        StrategyKind::FailFast => Box::new(FailFast),
    }
}
