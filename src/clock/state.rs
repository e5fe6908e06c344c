//! Workout state representation
//!
//! [`WorkoutState`] is a small `Copy` record replaced wholesale on every
//! tick. It carries no references into the exercise list, so a host can
//! store, compare and serialize it freely.

use serde::{Deserialize, Serialize};

/// Lead-in countdown, in ticks, before the first exercise starts.
///
/// Independent of any exercise's configured rest duration.
pub const READY_LEAD_IN: u32 = 10;

/// Phase of a running workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Pre-workout lead-in countdown.
    Ready,
    /// Active work interval.
    Workout,
    /// Recovery interval between sets or exercises.
    Rest,
    /// Terminal; every further tick is a no-op.
    Finished,
}

impl Phase {
    /// Returns the phase name as used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Workout => "workout",
            Self::Rest => "rest",
            Self::Finished => "finished",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete state of the workout clock between two ticks.
///
/// Invariants for clock-produced states:
/// - `exercise_index < exercises.len()` unless the phase is [`Phase::Finished`]
/// - `1 <= set_index <= set_count` of the current exercise while in
///   [`Phase::Workout`] or [`Phase::Rest`]
///
/// Timers are unsigned and therefore never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkoutState {
    /// Current phase.
    pub phase: Phase,
    /// Zero-based index into the exercise list.
    pub exercise_index: usize,
    /// One-based set number within the current exercise.
    pub set_index: u32,
    /// Seconds remaining in the current work interval.
    pub workout_timer: u32,
    /// Seconds remaining in the current rest or lead-in interval.
    pub rest_timer: u32,
}

impl WorkoutState {
    /// State of a workout with nothing to do.
    #[must_use]
    pub const fn finished() -> Self {
        Self {
            phase: Phase::Finished,
            exercise_index: 0,
            set_index: 0,
            workout_timer: 0,
            rest_timer: 0,
        }
    }

    /// Returns `true` once the workout has reached its terminal phase.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Seconds remaining on whichever timer the current phase counts down.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        match self.phase {
            Phase::Ready | Phase::Rest => self.rest_timer,
            Phase::Workout => self.workout_timer,
            Phase::Finished => 0,
        }
    }
}
