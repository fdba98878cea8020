//! Drives the per-commit pipeline across every group of a batch.
//!
//! For each commit, in the order given: duplicate check, pick, and on
//! failure either the missing-commit resolver or the conflict strategy.
//! Outcomes fold into a single [`BatchState`]. An abort stops the whole
//! batch and triggers exactly one rollback to the recorded start. An
//! interrupt at a conflict prompt ends the run with an error and no rollback.
//!
//! The working tree is a single shared resource: one orchestrator per
//! checkout, and nothing else should touch the checkout during a run.

use tracing::{debug, info, info_span, warn};

use super::classify::classify;
use super::duplicate::find_existing;
use super::executor::PickExecutor;
use super::report::{emit, BatchEvent, BatchReporter};
use super::resolver::MissingCommitResolver;
use super::rollback::rollback;
use super::state::{AppliedVia, BatchResult, BatchState, PickOutcome, SkipReason, StartingPosition};
use super::strategy::{Conflict, Resolution, ResolutionStrategy};
use super::BatchError;
use crate::core::plan::BatchPlan;
use crate::core::types::{Commit, Group};
use crate::git::{CherryPickResult, GitBackend};

/// Run-wide settings that do not change during a batch
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Remote to fetch when a commit is missing locally
    pub remote: String,
    /// Branch to fetch when a group names none
    pub source_branch: String,
    /// Record which groups got at least one commit applied
    pub track_groups: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            source_branch: "main".to_string(),
            track_groups: false,
        }
    }
}

/// Owns the batch state for one run
pub struct Orchestrator<'a> {
    git: &'a dyn GitBackend,
    strategy: Box<dyn ResolutionStrategy + 'a>,
    reporter: &'a mut dyn BatchReporter,
    resolver: MissingCommitResolver,
    options: BatchOptions,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        git: &'a dyn GitBackend,
        strategy: Box<dyn ResolutionStrategy + 'a>,
        reporter: &'a mut dyn BatchReporter,
        options: BatchOptions,
    ) -> Self {
        let resolver = MissingCommitResolver::new(&options.remote, &options.source_branch);
        Self {
            git,
            strategy,
            reporter,
            resolver,
            options,
        }
    }

    /// Process every group in order and return the summary.
    ///
    /// `Err` means the run could not start, was interrupted, or could not
    /// roll back; all per-commit failures end up in the result instead.
    pub fn run(mut self, plan: &BatchPlan) -> Result<BatchResult, BatchError> {
        if self.git.cherry_pick_in_progress() {
            return Err(BatchError::PickInProgress);
        }
        let start =
            StartingPosition::capture(self.git).map_err(BatchError::StartingPosition)?;

        let _span = info_span!(
            "batch",
            strategy = %self.strategy.kind(),
            groups = plan.groups.len(),
            commits = plan.commit_count()
        )
        .entered();
        info!(start = %start, "Starting batch");

        let mut state = BatchState::new(self.options.track_groups);

        'groups: for group in &plan.groups {
            emit(
                self.reporter,
                BatchEvent::GroupStarted {
                    group_id: group.id,
                    title: group.title.clone(),
                    commits: group.commits.len(),
                },
            );

            for commit in &group.commits {
                state.dequeue();
                let outcome = self.process_commit(group, commit)?;
                state.record(group.id, &commit.hash, &outcome);
                if state.stopped {
                    break 'groups;
                }
            }
        }

        let rolled_back = if state.stopped {
            rollback(self.git, &start, self.reporter)?;
            true
        } else {
            false
        };

        info!(
            applied = state.applied_count,
            skipped = state.skipped_count,
            auto_resolved = state.auto_resolved_count,
            stopped = state.stopped,
            "Batch finished"
        );
        Ok(state.into_result(start, rolled_back))
    }

    fn process_commit(
        &mut self,
        group: &Group,
        commit: &Commit,
    ) -> Result<PickOutcome, BatchError> {
        if let Some(existing) = find_existing(self.git, commit) {
            emit(
                self.reporter,
                BatchEvent::AlreadyPresent {
                    hash: commit.hash.clone(),
                    existing,
                },
            );
            return Ok(PickOutcome::Skipped(SkipReason::AlreadyPresent));
        }

        emit(
            self.reporter,
            BatchEvent::Picking {
                hash: commit.hash.clone(),
                subject: commit.subject().to_string(),
            },
        );

        let diagnostic = match PickExecutor::new(self.git).apply(&commit.hash) {
            CherryPickResult::Applied(new_hash) => {
                emit(
                    self.reporter,
                    BatchEvent::Applied {
                        hash: commit.hash.clone(),
                        new_hash: new_hash.clone(),
                    },
                );
                return Ok(PickOutcome::Applied {
                    new_hash,
                    via: AppliedVia::Clean,
                });
            }
            CherryPickResult::Failed(diagnostic) => diagnostic,
        };

        let kind = classify(&diagnostic);
        debug!(hash = commit.short_hash(), ?kind, "Cherry-pick failed");
        if kind.needs_resolution() {
            self.handle_conflict(commit, &diagnostic)
        } else {
            Ok(self
                .resolver
                .resolve(self.git, group, commit, self.reporter))
        }
    }

    fn handle_conflict(
        &mut self,
        commit: &Commit,
        diagnostic: &str,
    ) -> Result<PickOutcome, BatchError> {
        emit(
            self.reporter,
            BatchEvent::ConflictEntered {
                hash: commit.hash.clone(),
                diagnostic: diagnostic.to_string(),
            },
        );

        let conflict = Conflict {
            commit,
            picked_hash: &commit.hash,
            diagnostic,
        };
        let outcome = match self.strategy.resolve(self.git, &conflict, self.reporter) {
            Resolution::Resolved { new_hash, via } => {
                emit(
                    self.reporter,
                    BatchEvent::Resolved {
                        hash: commit.hash.clone(),
                        new_hash: new_hash.clone(),
                    },
                );
                PickOutcome::Applied { new_hash, via }
            }
            Resolution::Skipped => {
                emit(
                    self.reporter,
                    BatchEvent::Skipped {
                        hash: commit.hash.clone(),
                        reason: SkipReason::StrategySkip,
                    },
                );
                PickOutcome::Skipped(SkipReason::StrategySkip)
            }
            Resolution::Aborted => {
                emit(
                    self.reporter,
                    BatchEvent::Aborted {
                        hash: commit.hash.clone(),
                    },
                );
                PickOutcome::Aborted
            }
            Resolution::Interrupted => {
                warn!(hash = commit.short_hash(), "Interrupted at conflict prompt");
                return Err(BatchError::Interrupted {
                    hash: commit.hash.clone(),
                });
            }
        };
        Ok(outcome)
    }
}
