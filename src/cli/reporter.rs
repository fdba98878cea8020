//! Terminal rendering of batch events

use crate::batch::report::{BatchEvent, BatchReporter};
use crate::cli::output::Output;

/// Prints each batch event as it happens
#[derive(Debug, Default)]
pub struct CliReporter;

impl BatchReporter for CliReporter {
    fn report(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::GroupStarted {
                group_id,
                title,
                commits,
            } => {
                Output::header(&format!("{} {}", Output::group_ref(*group_id), title));
                if *commits == 0 {
                    Output::skipped("no commits");
                }
            }
            BatchEvent::Picking { hash, subject } => {
                Output::info(&format!("Cherry-picking {} {}", Output::hash(hash), subject));
            }
            BatchEvent::AlreadyPresent { hash, existing } => Output::skipped(&format!(
                "{} already on branch as {}, skipping",
                Output::hash(hash),
                Output::hash(existing)
            )),
            BatchEvent::Applied { hash, new_hash } => Output::success(&format!(
                "Applied {} as {}",
                Output::hash(hash),
                Output::hash(new_hash)
            )),
            BatchEvent::MissingObject {
                hash,
                remote,
                branch,
            } => Output::warning(&format!(
                "{} not found locally, searching {}/{} by message",
                Output::hash(hash),
                remote,
                Output::branch_name(branch)
            )),
            BatchEvent::AppliedAlternate {
                hash,
                alternate,
                new_hash,
            } => Output::success(&format!(
                "Applied {} in place of {} as {}",
                Output::hash(alternate),
                Output::hash(hash),
                Output::hash(new_hash)
            )),
            BatchEvent::MissingNotFound { hash, detail } => {
                Output::warning(&format!("Skipping {}: {}", Output::hash(hash), detail))
            }
            BatchEvent::ConflictEntered { hash, diagnostic } => {
                Output::warning(&format!("Conflict picking {}", Output::hash(hash)));
                Output::detail(diagnostic, 5);
            }
            BatchEvent::MergeToolFailed { hash, detail } => Output::warning(&format!(
                "Merge tool did not resolve {}: {}",
                Output::hash(hash),
                detail
            )),
            BatchEvent::Resolved { hash, new_hash } => Output::success(&format!(
                "Resolved {} as {}",
                Output::hash(hash),
                Output::hash(new_hash)
            )),
            BatchEvent::Skipped { hash, reason } => {
                Output::skipped(&format!("Skipped {} ({})", Output::hash(hash), reason))
            }
            BatchEvent::Aborted { hash } => {
                Output::error(&format!("Batch aborted at {}", Output::hash(hash)))
            }
            BatchEvent::RolledBack { to } => Output::warning(&format!(
                "Rolled back to starting position {}",
                Output::hash(to)
            )),
        }
    }
}
