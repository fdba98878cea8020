//! Failure classification for cherry-pick diagnostics.
//!
//! Matching on git's text output is the one fragile step in the pipeline,
//! so it lives behind the single [`classify`] function.

use once_cell::sync::Lazy;
use regex::Regex;

/// What a failed cherry-pick means for the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The commit object is not present in the local object store
    MissingObject,
    /// The changes could not be combined with the current tree
    ContentConflict,
    /// Anything else git reported
    Unknown,
}

impl FailureKind {
    /// Whether the failure goes to the configured resolution strategy.
    /// `Unknown` is handled like a conflict so it is never dropped silently.
    pub fn needs_resolution(self) -> bool {
        matches!(self, FailureKind::ContentConflict | FailureKind::Unknown)
    }
}

static MISSING_OBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(bad object|bad revision|unknown revision|not a valid object name|not a commit|could not parse object)",
    )
    .expect("hardcoded pattern must be valid")
});

static CONTENT_CONFLICT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(CONFLICT \(|could not apply|after resolving the conflicts|Merge conflict in)")
        .expect("hardcoded pattern must be valid")
});

/// Map a cherry-pick failure's diagnostic text to a [`FailureKind`]
pub fn classify(failure_text: &str) -> FailureKind {
    if CONTENT_CONFLICT.is_match(failure_text) {
        FailureKind::ContentConflict
    } else if MISSING_OBJECT.is_match(failure_text) {
        FailureKind::MissingObject
    } else {
        FailureKind::Unknown
    }
}
