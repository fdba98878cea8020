//! The single "apply this commit" step.

use std::time::Instant;
use tracing::debug;

use crate::core::types::short_hash;
use crate::git::{CherryPickResult, GitBackend};

/// Applies one commit and reports the raw result; never retries or prompts
pub struct PickExecutor<'a> {
    git: &'a dyn GitBackend,
}

impl<'a> PickExecutor<'a> {
    pub fn new(git: &'a dyn GitBackend) -> Self {
        Self { git }
    }

    pub fn apply(&self, hash: &str) -> CherryPickResult {
        let start = Instant::now();
        let result = self.git.cherry_pick(hash);
        debug!(
            hash = short_hash(hash),
            success = matches!(result, CherryPickResult::Applied(_)),
            duration_ms = start.elapsed().as_millis() as u64,
            "Cherry-pick attempt complete"
        );
        result
    }
}
