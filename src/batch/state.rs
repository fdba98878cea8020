//! Per-commit outcomes and the run-wide counters they fold into.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use crate::git::{GitBackend, GitError};

/// Why a commit was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// A commit with the same message is already in the target history
    AlreadyPresent,
    /// The object was missing and no same-message commit could be found
    MissingNotFound,
    /// The resolution strategy (or operator) chose to skip it
    StrategySkip,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyPresent => write!(f, "already present"),
            SkipReason::MissingNotFound => write!(f, "missing and not found by message"),
            SkipReason::StrategySkip => write!(f, "skipped during conflict resolution"),
        }
    }
}

/// How an applied commit got onto the branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AppliedVia {
    /// The pick went through without intervention
    Clean,
    /// The original object was missing; a same-message commit was picked instead
    AlternateHash { alternate: String },
    /// The operator resolved a conflict by hand
    Manual,
    /// A conflict was resolved in the merge tool
    MergeTool,
}

/// Terminal outcome of one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Applied { new_hash: String, via: AppliedVia },
    Skipped(SkipReason),
    Aborted,
}

/// Outcome kind, as reported per commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Applied,
    Skipped,
    Aborted,
}

/// What happened to one commit of the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitOutcome {
    pub group_id: u64,
    pub hash: String,
    pub outcome: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<AppliedVia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
}

impl CommitOutcome {
    pub fn new(group_id: u64, hash: &str, outcome: &PickOutcome) -> Self {
        let mut entry = Self {
            group_id,
            hash: hash.to_string(),
            outcome: OutcomeKind::Aborted,
            new_hash: None,
            via: None,
            reason: None,
        };
        match outcome {
            PickOutcome::Applied { new_hash, via } => {
                entry.outcome = OutcomeKind::Applied;
                entry.new_hash = Some(new_hash.clone());
                entry.via = Some(via.clone());
            }
            PickOutcome::Skipped(reason) => {
                entry.outcome = OutcomeKind::Skipped;
                entry.reason = Some(*reason);
            }
            PickOutcome::Aborted => {}
        }
        entry
    }
}

/// Tip of the target branch recorded before the first mutation of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StartingPosition(String);

impl StartingPosition {
    /// Record the current tip
    pub fn capture(git: &dyn GitBackend) -> Result<Self, GitError> {
        Ok(Self(git.head()?))
    }

    pub fn hash(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StartingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Running counters, owned by the orchestrator for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchState {
    pub applied_count: usize,
    pub skipped_count: usize,
    /// Conflicts resolved through the merge tool
    pub auto_resolved_count: usize,
    /// Commits taken off the queue so far
    pub dequeued_count: usize,
    pub stopped: bool,
    /// Present only when per-group tracking was requested
    pub groups_with_applied_commits: Option<BTreeSet<u64>>,
    /// One entry per dequeued commit, in processing order
    pub outcomes: Vec<CommitOutcome>,
}

impl BatchState {
    pub fn new(track_groups: bool) -> Self {
        Self {
            groups_with_applied_commits: track_groups.then(BTreeSet::new),
            ..Self::default()
        }
    }

    /// Note that a commit was taken off the queue
    pub fn dequeue(&mut self) {
        debug_assert!(!self.stopped, "dequeued after the batch stopped");
        self.dequeued_count += 1;
    }

    /// Fold one commit's outcome into the counters
    pub fn record(&mut self, group_id: u64, hash: &str, outcome: &PickOutcome) {
        self.outcomes.push(CommitOutcome::new(group_id, hash, outcome));
        match outcome {
            PickOutcome::Applied { via, .. } => {
                self.applied_count += 1;
                if matches!(via, AppliedVia::MergeTool) {
                    self.auto_resolved_count += 1;
                }
                if let Some(groups) = self.groups_with_applied_commits.as_mut() {
                    groups.insert(group_id);
                }
            }
            PickOutcome::Skipped(_) => self.skipped_count += 1,
            PickOutcome::Aborted => self.stopped = true,
        }
    }

    pub fn into_result(self, starting_position: StartingPosition, rolled_back: bool) -> BatchResult {
        BatchResult {
            applied_count: self.applied_count,
            skipped_count: self.skipped_count,
            auto_resolved_count: self.auto_resolved_count,
            groups_with_applied_commits: self
                .groups_with_applied_commits
                .map(|groups| groups.into_iter().collect()),
            stopped: self.stopped,
            starting_position,
            rolled_back,
            outcomes: self.outcomes,
        }
    }
}

/// Summary of a finished (or aborted) run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub applied_count: usize,
    pub skipped_count: usize,
    pub auto_resolved_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups_with_applied_commits: Option<Vec<u64>>,
    pub stopped: bool,
    pub starting_position: StartingPosition,
    pub rolled_back: bool,
    pub outcomes: Vec<CommitOutcome>,
}
