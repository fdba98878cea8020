//! Tracing subscriber initialization.

use tracing::Level;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Configuration for the log subscriber.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Level for prpick's own events
    pub default_level: Level,
    /// Whether to include file and line numbers
    pub include_file_line: bool,
    /// Whether to include the target (module path)
    pub include_target: bool,
    /// Whether to use ANSI colors
    pub ansi_colors: bool,
    /// Custom filter directive (overrides default_level if set)
    pub filter_directive: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            include_file_line: false,
            include_target: false,
            ansi_colors: true,
            filter_directive: None,
        }
    }
}

impl TelemetryConfig {
    /// Map `-v` occurrences to a level: none warns, one informs, more debugs
    pub fn from_verbosity(verbose: u8) -> Self {
        let default_level = match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        };
        Self {
            default_level,
            include_target: verbose > 1,
            include_file_line: verbose > 2,
            ..Self::default()
        }
    }

    /// Directive applied when `RUST_LOG` is not set
    pub fn directive(&self) -> String {
        self.filter_directive
            .clone()
            .unwrap_or_else(|| format!("prpick={}", self.default_level))
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// available for machine-readable output.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(env) if !env.is_empty() => EnvFilter::try_new(env)?,
        _ => EnvFilter::try_new(config.directive())?,
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.ansi_colors)
        .with_target(config.include_target)
        .with_file(config.include_file_line)
        .with_line_number(config.include_file_line)
        .compact();

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
