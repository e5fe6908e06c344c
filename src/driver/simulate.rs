//! Offline simulation
//!
//! Runs the clock to completion without sleeping. Used by the `simulate`
//! command to preview a workout's timeline and by tests to check whole-run
//! properties.

use serde::Serialize;
use tracing::warn;

use crate::clock::{self, Exercise, TickEvents, WorkoutState};

/// One tick of a simulated run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// State after the tick.
    pub state: WorkoutState,
    /// Events the tick emitted.
    pub events: TickEvents,
}

/// Number of ticks a validated workout takes from start to `Finished`.
///
/// Lead-in, every work interval and every rest except the one skipped after
/// the terminal set each cost `max(seconds, 1)` ticks. Returns 0 for an
/// empty list, which starts out finished. Saturates at `u64::MAX`.
#[must_use]
pub fn total_ticks(exercises: &[Exercise], lead_in: u32) -> u64 {
    let Some(last) = exercises.last() else {
        return 0;
    };

    let lead = u64::from(lead_in.max(1));
    let (work, rest) = exercises.iter().fold((0u64, 0u64), |(work, rest), e| {
        let sets = u64::from(e.set_count);
        (
            work.saturating_add(sets.saturating_mul(u64::from(e.workout_duration.max(1)))),
            rest.saturating_add(sets.saturating_mul(u64::from(e.rest_duration.max(1)))),
        )
    });
    let skipped_rest = u64::from(last.rest_duration.max(1));

    lead.saturating_add(work)
        .saturating_add(rest.saturating_sub(skipped_rest))
}

/// Upper bound on ticks for any input, including unvalidated zero set counts.
fn tick_budget(exercises: &[Exercise], lead_in: u32) -> u64 {
    let per_exercise: u64 = exercises
        .iter()
        .map(|e| {
            u64::from(e.set_count.max(1))
                * (u64::from(e.workout_duration.max(1)) + u64::from(e.rest_duration.max(1)))
        })
        .sum();
    u64::from(lead_in.max(1)) + per_exercise
}

/// Runs a workout from its initial state to `Finished`, recording every tick.
///
/// Stops early, with a warning, if the clock has not finished within the
/// tick budget derived from the exercise list.
#[must_use]
pub fn simulate(exercises: &[Exercise], lead_in: u32) -> Vec<TimelineEntry> {
    let budget = tick_budget(exercises, lead_in);
    let mut state = clock::initial_state_with_lead_in(exercises, lead_in);
    let mut timeline = Vec::new();

    let mut tick = 0u64;
    while !state.is_finished() {
        if tick >= budget {
            warn!(budget, "simulation exceeded its tick budget; stopping");
            break;
        }
        tick += 1;
        let (next, events) = clock::tick(state, exercises);
        state = next;
        timeline.push(TimelineEntry {
            tick,
            state,
            events,
        });
    }

    timeline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Phase, Sound, WorkoutEvent};

    #[test]
    fn test_total_ticks_empty() {
        assert_eq!(total_ticks(&[], 10), 0);
        assert!(simulate(&[], 10).is_empty());
    }

    #[test]
    fn test_total_ticks_single_set() {
        let exercises = vec![Exercise::new("Plank", 2, 5, 1)];
        assert_eq!(total_ticks(&exercises, 3), 5);
        assert_eq!(simulate(&exercises, 3).len(), 5);
    }

    #[test]
    fn test_total_ticks_matches_simulation() {
        let exercises = vec![
            Exercise::new("Squats", 4, 3, 2),
            Exercise::new("Plank", 6, 0, 3),
            Exercise::new("Lunges", 1, 2, 1),
        ];
        let timeline = simulate(&exercises, 5);
        assert_eq!(timeline.len() as u64, total_ticks(&exercises, 5));
        assert!(timeline.last().unwrap().state.is_finished());
    }

    #[test]
    fn test_timeline_ticks_are_sequential() {
        let exercises = vec![Exercise::new("Squats", 3, 2, 2)];
        let timeline = simulate(&exercises, 2);
        for (i, entry) in timeline.iter().enumerate() {
            assert_eq!(entry.tick, i as u64 + 1);
        }
    }

    #[test]
    fn test_only_last_tick_finishes() {
        let exercises = vec![Exercise::new("Squats", 3, 2, 2), Exercise::new("Row", 2, 2, 2)];
        let timeline = simulate(&exercises, 3);
        let finished: Vec<u64> = timeline
            .iter()
            .filter(|e| e.events.contains(&WorkoutEvent::Finished))
            .map(|e| e.tick)
            .collect();
        assert_eq!(finished, vec![timeline.len() as u64]);
    }

    #[test]
    fn test_start_cue_once_per_set() {
        let exercises = vec![Exercise::new("Squats", 3, 2, 2), Exercise::new("Row", 2, 2, 3)];
        let starts = simulate(&exercises, 3)
            .iter()
            .flat_map(|e| e.events.sounds().collect::<Vec<_>>())
            .filter(|s| *s == Sound::Start)
            .count();
        assert_eq!(starts, 5);
    }

    #[test]
    fn test_rest_count_skips_terminal_set() {
        let exercises = vec![Exercise::new("Squats", 3, 2, 2), Exercise::new("Row", 2, 2, 3)];
        let rests = simulate(&exercises, 3)
            .iter()
            .filter(|e| e.events.contains(&WorkoutEvent::phase_changed(Phase::Rest)))
            .count();
        assert_eq!(rests, 4);
    }

    #[test]
    fn test_unvalidated_zero_sets_terminates() {
        let exercises = vec![Exercise::new("Broken", 2, 1, 0)];
        let timeline = simulate(&exercises, 1);
        assert!(timeline.last().unwrap().state.is_finished());
    }
}
