//! Interactive conflict prompt

use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use std::io;

use crate::batch::strategy::{Conflict, OperatorPrompt};
use crate::core::types::short_hash;

/// Asks the operator on the terminal how to handle a conflict.
///
/// Instructions go to stderr so stdout stays clean for `--json`.
#[derive(Default)]
pub struct DialoguerPrompt {
    theme: ColorfulTheme,
}

impl DialoguerPrompt {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OperatorPrompt for DialoguerPrompt {
    fn ask(&mut self, conflict: &Conflict<'_>) -> io::Result<String> {
        eprintln!();
        eprintln!(
            "{} Conflict while picking {} {}",
            "⚠".yellow(),
            short_hash(conflict.picked_hash).yellow(),
            conflict.commit.subject()
        );
        eprintln!("  Resolve the conflicts in your editor, then choose:");
        eprintln!("    {}  stage everything and continue", "y".green().bold());
        eprintln!("    {}  skip this commit", "s".yellow().bold());
        eprintln!("    {}  abort the batch and roll back", "q".red().bold());

        Input::<String>::with_theme(&self.theme)
            .with_prompt("Your choice (y/s/q)")
            .allow_empty(true)
            .interact_text()
            // Keep the io error kind: Ctrl-C in raw mode arrives as Interrupted
            .map_err(|dialoguer::Error::IO(e)| e)
    }
}
