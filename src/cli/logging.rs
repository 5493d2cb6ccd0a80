// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Logging setup for the command-line tool.
//!
//! Library code only emits `tracing` events. The binary builds a subscriber
//! with [`subscriber`] and installs it for the duration of a run with
//! [`tracing::subscriber::with_default`], so tests can capture output by
//! supplying their own writer.

use std::io::IsTerminal;

use colored::Colorize;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::PredictError;

/// Filter used when `RUST_LOG` is unset or empty.
pub const DEFAULT_FILTER: &str = "info";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `info` or `model_predict=debug`.
    pub filter: String,
    /// Emit ANSI colors.
    pub ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            ansi: false,
        }
    }
}

impl LogConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `RUST_LOG` and `NO_COLOR`; colors also require stderr to be a terminal.
    #[must_use]
    pub fn from_env() -> Self {
        let filter = std::env::var("RUST_LOG")
            .ok()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            filter,
            ansi: !no_color && std::io::stderr().is_terminal(),
        }
    }

    /// Set the filter directives.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub const fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }
}

/// Build a `fmt` subscriber writing `timestamp LEVEL target: message` lines
/// to `writer`.
pub fn subscriber<W>(config: &LogConfig, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.filter))
        .with_writer(writer)
        .with_ansi(config.ansi)
        .with_target(true)
        .finish()
}

/// Render an unrecoverable error as the line printed before exiting.
#[must_use]
pub fn fatal_message(err: &PredictError) -> String {
    format!("{} {err}", "Error:".red().bold())
}

/// Print an unrecoverable error to stderr.
pub fn report_fatal(err: &PredictError) {
    eprintln!("{}", fatal_message(err));
}
