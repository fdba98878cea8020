//! Rollback of an aborted batch.

use tracing::warn;

use super::report::{emit, BatchEvent, BatchReporter};
use super::state::StartingPosition;
use super::BatchError;
use crate::git::GitBackend;

/// Reset the target branch to the tip recorded before the batch started,
/// discarding every commit the batch created.
///
/// Resets to the recorded hash rather than stepping back by the number of
/// applied commits: the two differ as soon as a pick lands somewhere other
/// than one commit past the previous tip.
pub fn rollback(
    git: &dyn GitBackend,
    start: &StartingPosition,
    reporter: &mut dyn BatchReporter,
) -> Result<(), BatchError> {
    if git.cherry_pick_in_progress() {
        if let Err(e) = git.cherry_pick_abort() {
            warn!(error = %e, "Failed to abort cherry-pick before rollback");
        }
    }

    git.reset_hard(start.hash()).map_err(|source| BatchError::Rollback {
        to: start.hash().to_string(),
        source,
    })?;

    emit(
        reporter,
        BatchEvent::RolledBack {
            to: start.hash().to_string(),
        },
    );
    Ok(())
}
