//! Recovery for commits whose object is missing locally.
//!
//! A squash or rebase merge leaves the group's original commits unreachable,
//! so the hash handed to the batch may not exist in the local object store.
//! The resolver fetches the branch the group was merged into once, looks for
//! a commit with the same subject once, and picks that commit once.

use super::executor::PickExecutor;
use super::report::{emit, BatchEvent, BatchReporter};
use super::state::{AppliedVia, PickOutcome, SkipReason};
use crate::core::types::{short_hash, Commit, Group};
use crate::git::{CherryPickResult, GitBackend};

/// Where to look for replacements of missing commits
#[derive(Debug, Clone)]
pub struct MissingCommitResolver {
    remote: String,
    default_branch: String,
}

impl MissingCommitResolver {
    pub fn new(remote: impl Into<String>, default_branch: impl Into<String>) -> Self {
        Self {
            remote: remote.into(),
            default_branch: default_branch.into(),
        }
    }

    /// Resolve a missing commit to `Applied` (via the alternate hash) or
    /// `Skipped(MissingNotFound)`. Never hands off to a conflict strategy.
    pub fn resolve(
        &self,
        git: &dyn GitBackend,
        group: &Group,
        commit: &Commit,
        reporter: &mut dyn BatchReporter,
    ) -> PickOutcome {
        let branch = group
            .source_branch
            .as_deref()
            .unwrap_or(&self.default_branch);

        emit(
            reporter,
            BatchEvent::MissingObject {
                hash: commit.hash.clone(),
                remote: self.remote.clone(),
                branch: branch.to_string(),
            },
        );

        if let Err(e) = git.fetch_branch(&self.remote, branch) {
            return not_found(
                reporter,
                commit,
                format!("fetching {}/{} failed: {}", self.remote, branch, e),
            );
        }

        let tracking = format!("{}/{}", self.remote, branch);
        let alternate = match git.find_commit_by_message(Some(&tracking), commit.subject()) {
            Ok(Some(alternate)) => alternate,
            Ok(None) => {
                return not_found(
                    reporter,
                    commit,
                    format!(
                        "no commit with the same message on {}; it may have been squashed or merged differently",
                        tracking
                    ),
                )
            }
            Err(e) => {
                return not_found(
                    reporter,
                    commit,
                    format!("searching {} failed: {}", tracking, e),
                )
            }
        };

        match PickExecutor::new(git).apply(&alternate) {
            CherryPickResult::Applied(new_hash) => {
                emit(
                    reporter,
                    BatchEvent::AppliedAlternate {
                        hash: commit.hash.clone(),
                        alternate: alternate.clone(),
                        new_hash: new_hash.clone(),
                    },
                );
                PickOutcome::Applied {
                    new_hash,
                    via: AppliedVia::AlternateHash { alternate },
                }
            }
            CherryPickResult::Failed(diagnostic) => {
                if git.cherry_pick_in_progress() {
                    if let Err(e) = git.cherry_pick_abort() {
                        tracing::warn!(error = %e, "Failed to abort cherry-pick");
                    }
                }
                let first_line = diagnostic
                    .lines()
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or("")
                    .trim()
                    .to_string();
                not_found(
                    reporter,
                    commit,
                    format!(
                        "same-message commit {} did not apply cleanly: {}",
                        short_hash(&alternate),
                        first_line
                    ),
                )
            }
        }
    }
}

fn not_found(reporter: &mut dyn BatchReporter, commit: &Commit, detail: String) -> PickOutcome {
    emit(
        reporter,
        BatchEvent::MissingNotFound {
            hash: commit.hash.clone(),
            detail,
        },
    );
    PickOutcome::Skipped(SkipReason::MissingNotFound)
}
