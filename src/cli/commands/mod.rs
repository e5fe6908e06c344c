//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod run;
pub mod simulate;
pub mod validate;
pub mod version;

use std::path::Path;

use crate::cli::Shutdown;
use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigLimits, ConfigLoader, LoadResult, WorkoutConfig};
use crate::driver::total_ticks;
use crate::error::{ConfigError, WorkoutClockError};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, shutdown: Shutdown) -> Result<(), WorkoutClockError> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Run(args) => run::run(&args, quiet, shutdown).await,
        Commands::Simulate(args) => simulate::run(&args),
        Commands::Validate(args) => validate::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}

/// Loads a workout file with default limits and logs its warnings.
pub(crate) fn load_workout(path: &Path) -> Result<LoadResult, ConfigError> {
    tracing::info!(file = %path.display(), "loading workout");
    let result = ConfigLoader::with_defaults().load(path)?;
    for warning in &result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
    Ok(result)
}

/// Picks the lead-in: command-line override first, then the workout file.
///
/// An override is re-checked against the workout length limit, since the
/// loader only saw the file's own lead-in.
pub(crate) fn resolve_lead_in(
    cli: Option<u32>,
    config: &WorkoutConfig,
) -> Result<u32, ConfigError> {
    resolve_lead_in_with_limits(cli, config, &ConfigLimits::default())
}

fn resolve_lead_in_with_limits(
    cli: Option<u32>,
    config: &WorkoutConfig,
    limits: &ConfigLimits,
) -> Result<u32, ConfigError> {
    match cli {
        Some(0) => Err(ConfigError::InvalidValue {
            field: "--lead-in".to_string(),
            value: "0".to_string(),
            expected: "a positive number of seconds".to_string(),
        }),
        Some(seconds) if total_ticks(&config.exercises, seconds) > limits.max_total_ticks => {
            Err(ConfigError::InvalidValue {
                field: "--lead-in".to_string(),
                value: seconds.to_string(),
                expected: format!(
                    "a workout of at most {} ticks (WORKOUT_CLOCK_MAX_TOTAL_TICKS)",
                    limits.max_total_ticks
                ),
            })
        }
        Some(seconds) => Ok(seconds),
        None => Ok(config.lead_in()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::READY_LEAD_IN;

    fn config(lead_in: Option<u32>) -> WorkoutConfig {
        WorkoutConfig {
            name: "Test".to_string(),
            lead_in,
            exercises: Vec::new(),
        }
    }

    #[test]
    fn test_lead_in_override_wins() {
        assert_eq!(resolve_lead_in(Some(3), &config(Some(7))).unwrap(), 3);
    }

    #[test]
    fn test_lead_in_from_file() {
        assert_eq!(resolve_lead_in(None, &config(Some(7))).unwrap(), 7);
    }

    #[test]
    fn test_lead_in_default() {
        assert_eq!(resolve_lead_in(None, &config(None)).unwrap(), READY_LEAD_IN);
    }

    #[test]
    fn test_zero_lead_in_rejected() {
        let err = resolve_lead_in(Some(0), &config(None)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_overlong_lead_in_rejected() {
        let limits = ConfigLimits {
            max_exercises: 500,
            max_config_size: 1024,
            max_total_ticks: 60,
        };
        assert_eq!(
            resolve_lead_in_with_limits(Some(60), &config(None), &limits).unwrap(),
            60
        );
        let err = resolve_lead_in_with_limits(Some(61), &config(None), &limits).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref value, .. } if value == "61"
        ));
    }
}
