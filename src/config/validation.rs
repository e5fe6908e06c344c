//! Configuration validation
//!
//! Semantic checks on a deserialized [`WorkoutConfig`]. The clock assumes
//! well-formed input (positive durations and set counts), so every
//! precondition it relies on is enforced here before a workout can run.
//!
//! Validation collects ALL issues (doesn't stop at first) to provide
//! comprehensive feedback to users.

use std::collections::HashSet;

use crate::clock::cue::ALMOST_WINDOW;
use crate::config::loader::ConfigLimits;
use crate::config::schema::{Exercise, WorkoutConfig};
use crate::driver::simulate::total_ticks;
use crate::error::{Severity, ValidationIssue};

/// Work intervals longer than this get a warning.
const LONG_INTERVAL_SECS: u32 = 60 * 60;

// ============================================================================
// Public API
// ============================================================================

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Workout definition validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a workout definition and returns all issues found.
    pub fn validate(&mut self, config: &WorkoutConfig, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_metadata(config);
        self.validate_exercises(&config.exercises);
        self.validate_limits(config, limits);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_metadata(&mut self, config: &WorkoutConfig) {
        if config.name.trim().is_empty() {
            self.add_error("name", "Workout name is required and cannot be empty");
        }

        if config.lead_in == Some(0) {
            self.add_error("lead_in", "Lead-in must be at least 1 second");
        }
    }

    fn validate_exercises(&mut self, exercises: &[Exercise]) {
        if exercises.is_empty() {
            self.add_warning(
                "exercises",
                "No exercises defined; the workout finishes immediately",
            );
            return;
        }

        let mut seen = HashSet::new();
        for (i, exercise) in exercises.iter().enumerate() {
            let path = format!("exercises[{i}]");
            self.validate_exercise(exercise, &path);

            if !exercise.name.is_empty() && !seen.insert(exercise.name.as_str()) {
                self.add_warning(
                    &format!("{path}.name"),
                    &format!("Duplicate exercise name '{}'", exercise.name),
                );
            }
        }
    }

    fn validate_exercise(&mut self, exercise: &Exercise, path: &str) {
        if exercise.name.trim().is_empty() {
            self.add_error(
                &format!("{path}.name"),
                "Exercise name is required and cannot be empty",
            );
        }

        if exercise.workout_duration == 0 {
            self.add_error(
                &format!("{path}.workout_duration"),
                "Workout duration must be at least 1 second",
            );
        } else if exercise.workout_duration > LONG_INTERVAL_SECS {
            self.add_warning(
                &format!("{path}.workout_duration"),
                "Workout duration is unusually long (> 1 hour)",
            );
        }

        if exercise.set_count == 0 {
            self.add_error(
                &format!("{path}.set_count"),
                "Set count must be at least 1",
            );
        }

        for &offset in &exercise.intermediate_beep_offsets {
            let offset_path = format!("{path}.intermediate_beep_offsets");
            if offset == 0 || offset >= exercise.workout_duration {
                self.add_warning(
                    &offset_path,
                    &format!(
                        "Offset {offset} never fires (must be between 1 and {})",
                        exercise.workout_duration.saturating_sub(1)
                    ),
                );
            } else if ALMOST_WINDOW.contains(&offset) {
                self.add_warning(
                    &offset_path,
                    &format!("Offset {offset} overlaps the almost-pause countdown"),
                );
            }
        }
    }

    fn validate_limits(&mut self, config: &WorkoutConfig, limits: &ConfigLimits) {
        if config.exercises.len() > limits.max_exercises {
            self.add_error(
                "exercises",
                &format!(
                    "Too many exercises: {} (maximum: {}). \
                     Set WORKOUT_CLOCK_MAX_EXERCISES to increase the limit.",
                    config.exercises.len(),
                    limits.max_exercises
                ),
            );
        }

        let ticks = total_ticks(&config.exercises, config.lead_in());
        if ticks > limits.max_total_ticks {
            self.add_error(
                "exercises",
                &format!(
                    "Workout too long: {ticks} ticks (maximum: {}). \
                     Set WORKOUT_CLOCK_MAX_TOTAL_TICKS to increase the limit.",
                    limits.max_total_ticks
                ),
            );
        }
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
