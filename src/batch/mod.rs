//! Batch cherry-pick engine.
//!
//! Applies the commits of an ordered list of groups onto the checked-out
//! branch, one at a time, skipping work already present, recovering
//! commits that went missing through squash merges, and handing conflicts
//! to the chosen resolution strategy.

pub mod classify;
pub mod duplicate;
pub mod executor;
pub mod orchestrator;
pub mod pr_body;
pub mod report;
pub mod resolver;
pub mod rollback;
pub mod state;
pub mod strategy;

#[cfg(test)]
mod test_support;

pub use classify::{classify, FailureKind};
pub use orchestrator::{BatchOptions, Orchestrator};
pub use pr_body::{pr_branch_name, PrSummary};
pub use report::{BatchEvent, BatchReporter, LogReporter};
pub use state::{
    AppliedVia, BatchResult, CommitOutcome, OutcomeKind, PickOutcome, SkipReason,
    StartingPosition,
};
pub use strategy::{
    build_strategy, Conflict, ManualChoice, OperatorPrompt, Resolution, ResolutionStrategy,
    StrategyKind,
};

use thiserror::Error;

use crate::git::GitError;

/// Errors that end a batch run outside the per-commit outcomes
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Could not record starting position: {0}")]
    StartingPosition(#[source] GitError),

    #[error("A cherry-pick is already in progress; finish or abort it first")]
    PickInProgress,

    /// The operator interrupted a conflict prompt. Nothing was rolled back.
    #[error("Interrupted while resolving {hash}; no rollback was performed")]
    Interrupted { hash: String },

    #[error("Rollback to {to} failed: {source}")]
    Rollback {
        to: String,
        #[source]
        source: GitError,
    },
}
