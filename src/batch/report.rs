//! Batch events.
//!
//! Every step with a user-visible outcome is emitted as a [`BatchEvent`].
//! Rendering is up to the [`BatchReporter`]; events are always logged too.

use tracing::{info, warn};

use super::state::SkipReason;
use crate::core::types::short_hash;

/// Something the operator should be told about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    GroupStarted {
        group_id: u64,
        title: String,
        commits: usize,
    },
    Picking {
        hash: String,
        subject: String,
    },
    AlreadyPresent {
        hash: String,
        existing: String,
    },
    Applied {
        hash: String,
        new_hash: String,
    },
    /// The commit was missing locally and is being looked up on the source branch
    MissingObject {
        hash: String,
        remote: String,
        branch: String,
    },
    AppliedAlternate {
        hash: String,
        alternate: String,
        new_hash: String,
    },
    MissingNotFound {
        hash: String,
        detail: String,
    },
    ConflictEntered {
        hash: String,
        diagnostic: String,
    },
    MergeToolFailed {
        hash: String,
        detail: String,
    },
    Resolved {
        hash: String,
        new_hash: String,
    },
    Skipped {
        hash: String,
        reason: SkipReason,
    },
    Aborted {
        hash: String,
    },
    RolledBack {
        to: String,
    },
}

/// Receives batch events as they happen
pub trait BatchReporter {
    fn report(&mut self, event: &BatchEvent);
}

/// Reporter that only logs
#[derive(Debug, Default)]
pub struct LogReporter;

impl BatchReporter for LogReporter {
    fn report(&mut self, _event: &BatchEvent) {}
}

/// Log an event through tracing
pub(crate) fn log_event(event: &BatchEvent) {
    match event {
        BatchEvent::GroupStarted {
            group_id,
            title,
            commits,
        } => info!(group_id, title = %title, commits, "Processing group"),
        BatchEvent::Picking { hash, subject } => {
            info!(hash = short_hash(hash), subject = %subject, "Cherry-picking")
        }
        BatchEvent::AlreadyPresent { hash, existing } => info!(
            hash = short_hash(hash),
            existing = short_hash(existing),
            "Already present"
        ),
        BatchEvent::Applied { hash, new_hash } => info!(
            hash = short_hash(hash),
            new_hash = short_hash(new_hash),
            "Applied"
        ),
        BatchEvent::MissingObject {
            hash,
            remote,
            branch,
        } => warn!(hash = short_hash(hash), %remote, %branch, "Commit missing locally"),
        BatchEvent::AppliedAlternate {
            hash,
            alternate,
            new_hash,
        } => info!(
            hash = short_hash(hash),
            alternate = short_hash(alternate),
            new_hash = short_hash(new_hash),
            "Applied same-message commit"
        ),
        BatchEvent::MissingNotFound { hash, detail } => {
            warn!(hash = short_hash(hash), %detail, "Missing commit skipped")
        }
        BatchEvent::ConflictEntered { hash, .. } => {
            warn!(hash = short_hash(hash), "Conflict")
        }
        BatchEvent::MergeToolFailed { hash, detail } => {
            warn!(hash = short_hash(hash), %detail, "Merge tool did not resolve conflict")
        }
        BatchEvent::Resolved { hash, new_hash } => info!(
            hash = short_hash(hash),
            new_hash = short_hash(new_hash),
            "Conflict resolved"
        ),
        BatchEvent::Skipped { hash, reason } => {
            info!(hash = short_hash(hash), %reason, "Skipped")
        }
        BatchEvent::Aborted { hash } => warn!(hash = short_hash(hash), "Batch aborted"),
        BatchEvent::RolledBack { to } => warn!(to = short_hash(to), "Rolled back"),
    }
}

/// Log an event and hand it to the reporter
pub(crate) fn emit(reporter: &mut dyn BatchReporter, event: BatchEvent) {
    log_event(&event);
    reporter.report(&event);
}
