//! Configuration schema types
//!
//! This module defines the workout definition format. Workouts are
//! deserialized from YAML; JSON files load too since YAML is a superset.
//!
//! ```yaml
//! name: Morning circuit
//! lead_in: 10
//! exercises:
//!   - name: Squats
//!     workout_duration: 40
//!     rest_duration: 20
//!     set_count: 3
//!     intermediate_beep_offsets: [20]
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

// ============================================================================
// Workout Definition
// ============================================================================

/// Root of a workout definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct WorkoutConfig {
    /// Display name of the workout (required)
    pub name: String,

    /// Lead-in seconds before the first exercise; defaults to
    /// [`READY_LEAD_IN`](crate::clock::READY_LEAD_IN)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_in: Option<u32>,

    /// Exercises in the order they are performed
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl WorkoutConfig {
    /// Effective lead-in for this workout.
    #[must_use]
    pub fn lead_in(&self) -> u32 {
        self.lead_in.unwrap_or(crate::clock::READY_LEAD_IN)
    }
}

// ============================================================================
// Exercise
// ============================================================================

/// One exercise of the catalog.
///
/// Immutable once loaded; the clock only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Exercise {
    /// Exercise name, forwarded in `StartExercise` events
    pub name: String,

    /// Seconds of work per set (must be at least 1)
    pub workout_duration: u32,

    /// Seconds of rest after each set
    #[serde(default)]
    pub rest_duration: u32,

    /// Number of sets (must be at least 1)
    #[serde(default = "default_set_count")]
    pub set_count: u32,

    /// Remaining-seconds values at which an intermediate beep sounds
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub intermediate_beep_offsets: BTreeSet<u32>,
}

const fn default_set_count() -> u32 {
    1
}

impl Exercise {
    /// Creates an exercise without intermediate beeps.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        workout_duration: u32,
        rest_duration: u32,
        set_count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            workout_duration,
            rest_duration,
            set_count,
            intermediate_beep_offsets: BTreeSet::new(),
        }
    }

    /// Adds intermediate beep offsets, builder style.
    #[must_use]
    pub fn with_beeps(mut self, offsets: impl IntoIterator<Item = u32>) -> Self {
        self.intermediate_beep_offsets.extend(offsets);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_exercise_defaults() {
        let yaml = "name: Plank\nworkout_duration: 30\n";
        let exercise: Exercise = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(exercise, Exercise::new("Plank", 30, 0, 1));
    }

    #[test]
    fn test_parse_full_workout() {
        let yaml = r"
name: Circuit
lead_in: 5
exercises:
  - name: Squats
    workout_duration: 40
    rest_duration: 20
    set_count: 3
    intermediate_beep_offsets: [30, 20, 20]
";
        let config: WorkoutConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.lead_in(), 5);
        assert_eq!(config.exercises.len(), 1);
        let offsets: Vec<u32> = config.exercises[0]
            .intermediate_beep_offsets
            .iter()
            .copied()
            .collect();
        assert_eq!(offsets, vec![20, 30]);
    }

    #[test]
    fn test_parse_json_workout() {
        let json = r#"{"name": "J", "exercises": [{"name": "A", "workout_duration": 10}]}"#;
        let config: WorkoutConfig = serde_yaml::from_str(json).unwrap();
        assert_eq!(config.exercises[0].name, "A");
        assert_eq!(config.lead_in(), crate::clock::READY_LEAD_IN);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "name: Plank\nworkout_duration: 30\nreps: 12\n";
        assert!(serde_yaml::from_str::<Exercise>(yaml).is_err());
    }

    #[test]
    fn test_negative_duration_rejected() {
        let yaml = "name: Plank\nworkout_duration: -5\n";
        assert!(serde_yaml::from_str::<Exercise>(yaml).is_err());
    }

    #[test]
    fn test_with_beeps_builder() {
        let exercise = Exercise::new("Row", 60, 30, 2).with_beeps([30, 45]);
        assert!(exercise.intermediate_beep_offsets.contains(&30));
        assert!(exercise.intermediate_beep_offsets.contains(&45));
    }
}
