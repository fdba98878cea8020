//! Pick command implementation
//!
//! Loads a batch plan, merges the selected profile with command-line
//! flags, and runs the batch against the repository. In PR branch mode the
//! picks land on a fresh branch and a pull request title and body are
//! rendered from the result.

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use crate::batch::{
    build_strategy, pr_branch_name, BatchError, BatchOptions, BatchReporter, BatchResult,
    LogReporter, Orchestrator, PrSummary, StrategyKind,
};
use crate::cli::{CliReporter, DialoguerPrompt, Output};
use crate::core::{BatchPlan, ProfileConfig, ProfileFile};
use crate::git::branch::{checkout_branch, create_and_checkout_branch, delete_local_branch};
use crate::git::remote::push_branch;
use crate::git::{get_current_branch, open_repo, GitRepo};

/// Arguments for the pick command
#[derive(Debug, Clone, Default)]
pub struct PickArgs {
    /// Batch plan file (JSON or YAML)
    pub plan: PathBuf,
    /// Directory inside the repository to operate on
    pub repo: PathBuf,
    pub target: Option<String>,
    pub profile: Option<String>,
    pub fail_on_conflict: bool,
    pub merge_tool: bool,
    pub remote: Option<String>,
    pub source_branch: Option<String>,
    pub create_branch: bool,
    pub push: bool,
    pub pr_body_out: Option<PathBuf>,
    pub json: bool,
}

/// Title and body for the pull request of a PR branch run
#[derive(Debug, Clone, Serialize)]
pub struct PullRequestDraft {
    pub branch: String,
    pub base: String,
    pub title: String,
    pub body: String,
    pub pushed: bool,
}

/// Everything a pick run produced
#[derive(Debug, Clone, Serialize)]
pub struct PickReport {
    pub strategy: StrategyKind,
    /// Branch the picks were applied to
    pub branch: String,
    #[serde(flatten)]
    pub result: BatchResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequestDraft>,
}

/// Apply command-line overrides on top of the profile, or the defaults
/// when no profile was selected
pub fn resolve_settings(args: &PickArgs, profile: Option<ProfileConfig>) -> ProfileConfig {
    let mut config = profile.unwrap_or_default();
    if let Some(target) = &args.target {
        config.target_branch = Some(target.clone());
    }
    if let Some(remote) = &args.remote {
        config.remote = remote.clone();
    }
    if let Some(source_branch) = &args.source_branch {
        config.source_branch = source_branch.clone();
    }
    config.fail_on_conflict |= args.fail_on_conflict;
    config.merge_tool |= args.merge_tool;
    config.create_branch |= args.create_branch;
    config
}

/// Load the named profile from the nearest `.prpick.yaml`
pub fn load_profile(args: &PickArgs) -> anyhow::Result<Option<ProfileConfig>> {
    let name = match &args.profile {
        Some(name) => name,
        None => return Ok(None),
    };
    let start = std::fs::canonicalize(&args.repo)
        .with_context(|| format!("Cannot access {}", args.repo.display()))?;
    let (path, file) = ProfileFile::discover(&start)?;
    debug!(path = %path.display(), profile = %name, "Loaded profile file");
    Ok(Some(file.profile(name)?.clone()))
}

/// Whether a pick run ended because the operator interrupted it
pub fn is_interrupted(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<BatchError>(),
        Some(BatchError::Interrupted { .. })
    )
}

/// Run the pick command
pub fn run_pick(args: &PickArgs) -> anyhow::Result<PickReport> {
    let plan = BatchPlan::load(&args.plan)
        .with_context(|| format!("Failed to load batch plan {}", args.plan.display()))?;
    let config = resolve_settings(args, load_profile(args)?);
    let strategy_kind = StrategyKind::from_flags(config.fail_on_conflict, config.merge_tool);

    let repo = GitRepo::open(&args.repo)?;
    if let Some(target) = &config.target_branch {
        checkout_branch(repo.path(), target)?;
    }
    let git2_repo = open_repo(repo.path())?;
    let base_branch = get_current_branch(&git2_repo)?;

    let pr_branch = if config.create_branch {
        if git2_repo.head_detached()? {
            anyhow::bail!("PR branch mode needs a branch checked out, but HEAD is detached");
        }
        let name = pr_branch_name(&config.branch_prefix, Utc::now());
        create_and_checkout_branch(repo.path(), &name)?;
        if !args.json {
            Output::info(&format!("Created branch {}", Output::branch_name(&name)));
        }
        Some(name)
    } else {
        None
    };
    let branch = pr_branch.clone().unwrap_or_else(|| base_branch.clone());

    if !args.json {
        Output::header(&format!(
            "Cherry-picking {} commit(s) from {} group(s) onto {}",
            plan.commit_count(),
            plan.groups.len(),
            Output::branch_name(&branch)
        ));
        Output::kv("strategy", &strategy_kind.to_string());
    }

    let mut reporter: Box<dyn BatchReporter> = if args.json {
        Box::new(LogReporter)
    } else {
        Box::new(CliReporter)
    };
    let options = BatchOptions {
        remote: config.remote.clone(),
        source_branch: config.source_branch.clone(),
        track_groups: pr_branch.is_some(),
    };
    let strategy = build_strategy(strategy_kind, DialoguerPrompt::new());
    let result = Orchestrator::new(&repo, strategy, reporter.as_mut(), options).run(&plan)?;

    let mut pull_request = None;
    if let Some(pr_branch) = pr_branch {
        if result.stopped {
            checkout_branch(repo.path(), &base_branch)?;
            delete_local_branch(repo.path(), &pr_branch)?;
            if !args.json {
                Output::warning(&format!(
                    "Deleted branch {}",
                    Output::branch_name(&pr_branch)
                ));
            }
        } else {
            let pushed = if args.push {
                push_pr_branch(&repo, &pr_branch, &config.remote, args.json)?;
                true
            } else {
                false
            };

            let mut summary = PrSummary::from_result(&config.emoji, &plan, &result, Utc::now());
            summary.source_branch = Some(&config.source_branch);
            summary.target_branch = Some(&base_branch);
            summary.owner = config.owner.as_deref();
            summary.repo = config.repo.as_deref();
            let title = summary.title(config.pr_title.as_deref());
            let body = summary.body(config.pr_body_template.as_deref());

            checkout_branch(repo.path(), &base_branch)?;
            pull_request = Some(PullRequestDraft {
                branch: pr_branch,
                base: base_branch.clone(),
                title,
                body,
                pushed,
            });
        }
    }

    if let (Some(path), Some(draft)) = (&args.pr_body_out, &pull_request) {
        std::fs::write(path, &draft.body)
            .with_context(|| format!("Failed to write PR body to {}", path.display()))?;
    }

    let report = PickReport {
        strategy: strategy_kind,
        branch,
        result,
        pull_request,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, args.pr_body_out.is_some());
    }

    Ok(report)
}

fn push_pr_branch(repo: &GitRepo, branch: &str, remote: &str, quiet: bool) -> anyhow::Result<()> {
    let spinner = (!quiet).then(|| Output::spinner(&format!("Pushing {}...", branch)));
    let pushed = push_branch(repo.path(), branch, remote, true);
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    pushed.with_context(|| format!("Failed to push {} to {}", branch, remote))?;
    if !quiet {
        Output::success(&format!(
            "Pushed {} to {}",
            Output::branch_name(branch),
            remote
        ));
    }
    Ok(())
}

fn print_summary(report: &PickReport, body_written: bool) {
    let result = &report.result;

    Output::header("Summary");
    if result.stopped {
        Output::error("Batch aborted");
        if result.rolled_back {
            Output::kv(
                "rolled back to",
                &Output::hash(result.starting_position.hash()),
            );
        }
        return;
    }

    Output::success(&format!(
        "{} commit(s) cherry-picked onto {}",
        result.applied_count,
        Output::branch_name(&report.branch)
    ));
    if result.skipped_count > 0 {
        Output::skipped(&format!("{} commit(s) skipped", result.skipped_count));
    }
    if result.auto_resolved_count > 0 {
        Output::kv(
            "resolved in merge tool",
            &result.auto_resolved_count.to_string(),
        );
    }

    if let Some(draft) = &report.pull_request {
        Output::header("Pull request");
        Output::kv("branch", &Output::branch_name(&draft.branch));
        Output::kv("base", &Output::branch_name(&draft.base));
        Output::kv("title", &draft.title);
        if body_written {
            Output::info("PR body written to file");
        } else {
            println!();
            println!("{}", draft.body);
        }
    }
}
