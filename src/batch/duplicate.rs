//! Detection of commits that are already on the target branch.

use tracing::warn;

use crate::core::types::Commit;
use crate::git::GitBackend;

/// Look for a commit in the current history whose message contains this
/// commit's subject line, literally.
///
/// Matching is by message only: two distinct commits sharing a subject are
/// treated as the same change, and a subject edited during an earlier
/// resolution is not recognised. A failed search counts as "not found" so
/// the pick itself decides.
pub fn find_existing(git: &dyn GitBackend, commit: &Commit) -> Option<String> {
    match git.find_commit_by_message(None, commit.subject()) {
        Ok(found) => found,
        Err(e) => {
            warn!(hash = commit.short_hash(), error = %e, "Duplicate search failed");
            None
        }
    }
}
