//! CLI argument definitions
//!
//! All Clap derive structs for `workout-clock` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::observability::LogFormat;

// ============================================================================
// Root CLI
// ============================================================================

/// Tick-driven interval workout clock.
#[derive(Parser, Debug)]
#[command(name = "workout-clock", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "WORKOUT_CLOCK_COLOR")]
    pub color: ColorChoice,

    /// Log format.
    #[arg(long, default_value = "human", global = true, env = "WORKOUT_CLOCK_LOG_FORMAT")]
    pub log_format: LogFormatArg,
}

// ============================================================================
// Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a workout in real time.
    Run(RunArgs),

    /// Fast-forward a workout and print its timeline.
    Simulate(SimulateArgs),

    /// Validate workout files without running them.
    Validate(ValidateArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the workout file (YAML or JSON).
    #[arg(env = "WORKOUT_CLOCK_FILE")]
    pub file: PathBuf,

    /// Wall-clock duration of one tick (e.g. `1s`, `250ms`).
    #[arg(long, default_value = "1s", value_parser = parse_tick)]
    pub tick: Duration,

    /// Lead-in seconds before the first set, overriding the workout file.
    #[arg(long)]
    pub lead_in: Option<u32>,

    /// Write JSONL events to this file, or `-` for stdout.
    #[arg(long, env = "WORKOUT_CLOCK_EVENTS")]
    pub events: Option<PathBuf>,

    /// Serve Prometheus metrics on this port.
    #[arg(long, env = "WORKOUT_CLOCK_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Ring the terminal bell on sound cues.
    #[arg(long)]
    pub bell: bool,
}

/// Arguments for `simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Path to the workout file (YAML or JSON).
    pub file: PathBuf,

    /// Lead-in seconds before the first set, overriding the workout file.
    #[arg(long)]
    pub lead_in: Option<u32>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Workout files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

fn parse_tick(raw: &str) -> Result<Duration, String> {
    let period = humantime::parse_duration(raw).map_err(|e| e.to_string())?;
    if period.is_zero() {
        return Err("tick must be greater than zero".to_string());
    }
    Ok(period)
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Log format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormatArg {
    /// Human-readable lines.
    #[default]
    Human,
    /// Newline-delimited JSON.
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Human => Self::Human,
            LogFormatArg::Json => Self::Json,
        }
    }
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_with_file() {
        let cli = Cli::try_parse_from(["workout-clock", "run", "legs.yaml"]);
        assert!(cli.is_ok(), "Failed to parse: {cli:?}");
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["workout-clock", "run", "legs.yaml"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("Expected RunArgs");
        };
        assert_eq!(args.tick, Duration::from_secs(1));
        assert_eq!(args.lead_in, None);
        assert!(args.events.is_none());
        assert!(!args.bell);
    }

    #[test]
    fn test_tick_humantime() {
        let cli =
            Cli::try_parse_from(["workout-clock", "run", "x.yaml", "--tick", "250ms"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("Expected RunArgs");
        };
        assert_eq!(args.tick, Duration::from_millis(250));
    }

    #[test]
    fn test_zero_tick_rejected() {
        let result = Cli::try_parse_from(["workout-clock", "run", "x.yaml", "--tick", "0s"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_tick_rejected() {
        let result = Cli::try_parse_from(["workout-clock", "run", "x.yaml", "--tick", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_help_output() {
        let result = Cli::try_parse_from(["workout-clock", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let result = Cli::try_parse_from(["workout-clock", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_simulate_json_format() {
        let cli = Cli::try_parse_from(["workout-clock", "simulate", "x.yaml", "--format", "json"])
            .unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("Expected SimulateArgs");
        };
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_color_choices_parse() {
        for variant in ["auto", "always", "never"] {
            let cli = Cli::try_parse_from(["workout-clock", "--color", variant, "validate", "x.yaml"]);
            assert!(cli.is_ok(), "Failed to parse color={variant}");
        }
    }

    #[test]
    fn test_validate_requires_files() {
        let result = Cli::try_parse_from(["workout-clock", "validate"]);
        assert!(result.is_err(), "Expected error for missing files");
    }

    #[test]
    fn test_validate_strict() {
        let cli =
            Cli::try_parse_from(["workout-clock", "validate", "--strict", "a.yaml", "b.yaml"])
                .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("Expected ValidateArgs");
        };
        assert!(args.strict);
        assert_eq!(args.files.len(), 2);
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["workout-clock", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::try_parse_from(["workout-clock", "-vvv", "validate", "x.yaml"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::try_parse_from(["workout-clock", "--quiet", "validate", "x.yaml"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_exit_code_mapping() {
        use crate::error::{ConfigError, DriverError, ExitCode, WorkoutClockError};

        let cases: Vec<(WorkoutClockError, i32)> = vec![
            (
                ConfigError::MissingFile {
                    path: PathBuf::from("/x"),
                }
                .into(),
                ExitCode::CONFIG_ERROR,
            ),
            (
                DriverError::InvalidTickPeriod("x".into()).into(),
                ExitCode::DRIVER_ERROR,
            ),
            (
                std::io::Error::new(std::io::ErrorKind::NotFound, "x").into(),
                ExitCode::IO_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.exit_code(), expected, "Wrong exit code for {err}");
        }
    }
}
