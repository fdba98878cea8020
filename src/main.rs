//! prpick CLI entry point

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use tracing::warn;

use prpick::cli::commands::pick::{is_interrupted, run_pick, PickArgs};
use prpick::cli::Output;
use prpick::telemetry::{init_telemetry, TelemetryConfig};

/// Exit status after an interrupt (128 + SIGINT)
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Parser)]
#[command(name = "prpick")]
#[command(author, version, about = "Batch cherry-pick merged pull requests onto a target branch", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Cherry-pick every commit of a batch plan, group by group
    Pick {
        /// Batch plan file (JSON, or YAML with a .yaml/.yml extension)
        plan: PathBuf,
        /// Repository to operate on
        #[arg(short = 'C', long, default_value = ".")]
        repo: PathBuf,
        /// Branch to check out and pick onto
        #[arg(short, long)]
        target: Option<String>,
        /// Profile from .prpick.yaml to take defaults from
        #[arg(short, long, env = "PRPICK_PROFILE")]
        profile: Option<String>,
        /// Abort and roll back on the first conflict
        #[arg(long)]
        fail_on_conflict: bool,
        /// Open the merge tool on conflicts before asking
        #[arg(long)]
        merge_tool: bool,
        /// Remote to fetch when a commit is missing locally
        #[arg(long)]
        remote: Option<String>,
        /// Branch the groups were merged into
        #[arg(long)]
        source_branch: Option<String>,
        /// Pick onto a fresh branch and render a pull request for it
        #[arg(long)]
        create_branch: bool,
        /// Push the fresh branch after a successful run
        #[arg(long, requires = "create_branch")]
        push: bool,
        /// Write the pull request body to this file instead of stdout
        #[arg(long, requires = "create_branch")]
        pr_body_out: Option<PathBuf>,
        /// Output the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Report an interrupted batch and exit without touching the working tree
fn exit_interrupted() -> ! {
    warn!("Interrupted during batch");
    Output::warning_stderr(
        "Interrupted. The working tree may be in the middle of a cherry-pick and no rollback was performed.",
    );
    Output::warning_stderr(
        "Inspect it with 'git status'; 'git cherry-pick --abort' discards an unfinished pick.",
    );
    std::process::exit(INTERRUPTED_EXIT_CODE);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_telemetry(&TelemetryConfig::from_verbosity(cli.verbose))?;

    match cli.command {
        Some(Commands::Pick {
            plan,
            repo,
            target,
            profile,
            fail_on_conflict,
            merge_tool,
            remote,
            source_branch,
            create_branch,
            push,
            pr_body_out,
            json,
        }) => {
            let args = PickArgs {
                plan,
                repo,
                target,
                profile,
                fail_on_conflict,
                merge_tool,
                remote,
                source_branch,
                create_branch,
                push,
                pr_body_out,
                json,
            };

            // The batch blocks on git and on the operator; run it off the
            // runtime so an interrupt can still be observed.
            let batch = tokio::task::spawn_blocking(move || run_pick(&args));

            tokio::select! {
                joined = batch => {
                    match joined? {
                        Ok(report) if report.result.stopped => std::process::exit(1),
                        Ok(_) => {}
                        // Ctrl-C at a conflict prompt is read as a key, not a signal
                        Err(e) if is_interrupted(&e) => exit_interrupted(),
                        Err(e) => return Err(e),
                    }
                }
                _ = tokio::signal::ctrl_c() => exit_interrupted(),
            }
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "prpick", &mut std::io::stdout());
        }
        None => {
            println!("prpick - batch cherry-pick merged pull requests");
            println!("Run 'prpick --help' for usage");
        }
    }

    Ok(())
}
