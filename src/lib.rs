//! prpick - batch cherry-pick merged pull requests onto a target branch.
//!
//! The library exposes the batch engine so it can be driven without the
//! CLI: build a [`core::BatchPlan`], pick a [`batch::ResolutionStrategy`]
//! and run a [`batch::Orchestrator`] against a [`git::GitBackend`].

pub mod batch;
pub mod cli;
pub mod core;
pub mod git;
pub mod telemetry;
pub mod util;
