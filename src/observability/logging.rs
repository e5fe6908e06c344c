//! Logging setup
//!
//! Log lines always go to stderr. Stdout belongs to the console sink and to
//! `--events -`, and both must stay machine-readable.

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use crate::cli::args::ColorChoice;

/// Environment variable holding a full `tracing` filter.
pub const LOG_LEVEL_ENV: &str = "WORKOUT_CLOCK_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain lines, coloured when stderr is a terminal.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Filter directive for a `-v` count.
///
/// Our own crate gets the requested level; dependencies stay at `warn`
/// until `-vvv`.
#[must_use]
pub fn verbosity_directive(verbosity: u8) -> String {
    let own = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => return "trace".to_string(),
    };
    format!("warn,workout_clock={own}")
}

/// Decides whether to emit ANSI escapes.
#[must_use]
pub const fn use_ansi(color: ColorChoice, is_terminal: bool, no_color: bool) -> bool {
    match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => is_terminal && !no_color,
    }
}

/// Installs the global subscriber.
///
/// `WORKOUT_CLOCK_LOG_LEVEL` wins over `verbosity` when it parses. A second
/// call is a no-op.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_directive(verbosity)));
    let with_target = verbosity >= 2;

    let result = match format {
        LogFormat::Human => {
            let ansi = use_ansi(
                color,
                std::io::stderr().is_terminal(),
                std::env::var_os("NO_COLOR").is_some(),
            );
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_target(with_target);
            Registry::default().with(filter).with(layer).try_init()
        }
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_writer(std::io::stderr)
                .with_target(with_target);
            Registry::default().with(filter).with(layer).try_init()
        }
    };

    if result.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
