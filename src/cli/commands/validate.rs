//! `validate` command
//!
//! Loads each workout file and reports errors and warnings without running
//! anything.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::LoadResult;
use crate::driver::sink::format_clock;
use crate::driver::total_ticks;
use crate::error::{ConfigError, Severity, ValidationIssue, WorkoutClockError};

use super::load_workout;

/// Per-file outcome, as printed in JSON mode.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_ticks: Option<u64>,
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Validates every file in `args.files`.
///
/// All files are checked before returning; the first failure is returned.
///
/// # Errors
///
/// Returns the first file's config error. With `--strict`, a file with
/// warnings fails with a validation error listing them.
pub fn run(args: &ValidateArgs) -> Result<(), WorkoutClockError> {
    let mut first_error: Option<ConfigError> = None;
    let mut reports = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let outcome = load_workout(path).and_then(|loaded| check_strict(path, loaded, args.strict));
        let report = match outcome {
            Ok(loaded) => {
                tracing::info!(file = %path.display(), "workout valid");
                let config = &loaded.config;
                let ticks = total_ticks(&config.exercises, config.lead_in());
                FileReport {
                    file: path.display().to_string(),
                    valid: true,
                    total_ticks: Some(ticks),
                    errors: Vec::new(),
                    warnings: loaded.warnings.iter().map(ToString::to_string).collect(),
                }
            }
            Err(e) => {
                let report = failed_report(path, &e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
                report
            }
        };
        reports.push(report);
    }

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                print_human(report);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    first_error.map_or(Ok(()), |e| Err(e.into()))
}

/// Promotes warnings to errors in strict mode.
fn check_strict(path: &Path, loaded: LoadResult, strict: bool) -> Result<LoadResult, ConfigError> {
    if !strict || loaded.warnings.is_empty() {
        return Ok(loaded);
    }
    let errors = loaded
        .warnings
        .iter()
        .map(|w| ValidationIssue {
            path: w.location.clone().unwrap_or_default(),
            message: w.message.clone(),
            severity: Severity::Error,
        })
        .collect();
    Err(ConfigError::ValidationError {
        path: path.display().to_string(),
        errors,
    })
}

fn failed_report(path: &Path, err: &ConfigError) -> FileReport {
    let errors = match err {
        ConfigError::ValidationError { errors, .. } => {
            errors.iter().map(ToString::to_string).collect()
        }
        other => vec![other.to_string()],
    };
    FileReport {
        file: path.display().to_string(),
        valid: false,
        total_ticks: None,
        errors,
        warnings: Vec::new(),
    }
}

fn print_human(report: &FileReport) {
    if report.valid {
        let duration = report.total_ticks.map(format_clock).unwrap_or_default();
        println!("ok: {} ({duration})", report.file);
    } else {
        println!("FAILED: {}", report.file);
    }
    for error in &report.errors {
        println!("  {error}");
    }
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
}
