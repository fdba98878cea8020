//! CLI layer
//!
//! Terminal output, the conflict prompt and the command implementations.

pub mod commands;
pub mod output;
pub mod prompt;
pub mod reporter;

pub use output::Output;
pub use prompt::DialoguerPrompt;
pub use reporter::CliReporter;
