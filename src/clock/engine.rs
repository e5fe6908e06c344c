//! Phase dispatch and transitions
//!
//! [`tick`] dispatches on the current phase to one handler per phase. Each
//! handler takes the state by value, appends to the tick's [`TickEvents`]
//! and returns the next state. [`advance_round`] is shared by the
//! work-interval and rest-interval exits.

use super::Exercise;
use super::cue;
use super::event::{Sound, TickEvents, WorkoutEvent};
use super::state::{Phase, READY_LEAD_IN, WorkoutState};

/// Builds the starting state for `exercises` with the default lead-in.
///
/// An empty exercise list yields [`WorkoutState::finished`].
#[must_use]
pub fn initial_state(exercises: &[Exercise]) -> WorkoutState {
    initial_state_with_lead_in(exercises, READY_LEAD_IN)
}

/// Builds the starting state for `exercises` with an explicit lead-in.
#[must_use]
pub fn initial_state_with_lead_in(exercises: &[Exercise], lead_in: u32) -> WorkoutState {
    exercises
        .first()
        .map_or_else(WorkoutState::finished, |first| WorkoutState {
            phase: Phase::Ready,
            exercise_index: 0,
            set_index: 1,
            workout_timer: first.workout_duration,
            rest_timer: lead_in,
        })
}

/// Advances the workout by one tick.
///
/// Returns the next state and the events to dispatch, in order. A
/// [`Phase::Finished`] state is returned unchanged with no events.
///
/// # Panics
///
/// Panics if `state` was not produced by this clock for the same
/// `exercises` (an out-of-range `exercise_index` outside `Finished`).
#[must_use]
pub fn tick(state: WorkoutState, exercises: &[Exercise]) -> (WorkoutState, TickEvents) {
    let mut events = TickEvents::new();
    let next = match state.phase {
        Phase::Ready => on_ready(state, exercises, &mut events),
        Phase::Workout => on_workout(state, exercises, &mut events),
        Phase::Rest => on_rest(state, exercises, &mut events),
        Phase::Finished => state,
    };
    (next, events)
}

/// Returns `true` when `state` sits on the last set of the last exercise.
///
/// This is the only position where a work interval is not followed by rest.
#[must_use]
pub fn is_terminal_round(state: &WorkoutState, exercises: &[Exercise]) -> bool {
    exercises.len().checked_sub(1) == Some(state.exercise_index)
        && exercises
            .get(state.exercise_index)
            .is_some_and(|e| state.set_index == e.set_count)
}

fn on_ready(
    mut state: WorkoutState,
    exercises: &[Exercise],
    events: &mut TickEvents,
) -> WorkoutState {
    if state.rest_timer > 1 {
        state.rest_timer -= 1;
        if let Some(sound) = cue::rest_cue(state.rest_timer) {
            events.push(WorkoutEvent::sound(sound));
        }
        return state;
    }

    let exercise = &exercises[state.exercise_index];
    state.phase = Phase::Workout;
    // The lead-in borrowed the rest timer; the first rest uses the exercise's own.
    state.rest_timer = exercise.rest_duration;
    events.push(WorkoutEvent::sound(Sound::Start));
    events.push(WorkoutEvent::phase_changed(Phase::Workout));
    events.push(WorkoutEvent::start_exercise(exercise.name.as_str()));
    state
}

fn on_workout(
    mut state: WorkoutState,
    exercises: &[Exercise],
    events: &mut TickEvents,
) -> WorkoutState {
    if state.workout_timer > 1 {
        state.workout_timer -= 1;
        let (almost, intermediate) =
            cue::work_cues(&exercises[state.exercise_index], state.workout_timer);
        for sound in [almost, intermediate].into_iter().flatten() {
            events.push(WorkoutEvent::sound(sound));
        }
        return state;
    }

    if is_terminal_round(&state, exercises) {
        return advance_round(state, exercises, events);
    }

    state.phase = Phase::Rest;
    events.push(WorkoutEvent::sound(Sound::Pause));
    events.push(WorkoutEvent::phase_changed(Phase::Rest));
    state
}

fn on_rest(
    mut state: WorkoutState,
    exercises: &[Exercise],
    events: &mut TickEvents,
) -> WorkoutState {
    if state.rest_timer > 1 {
        state.rest_timer -= 1;
        if let Some(sound) = cue::rest_cue(state.rest_timer) {
            events.push(WorkoutEvent::sound(sound));
        }
        return state;
    }

    advance_round(state, exercises, events)
}

/// Moves to the next set, or the next exercise once all sets are done.
///
/// Running past the last exercise finishes the workout and emits only
/// [`WorkoutEvent::Finished`]; timers are left as they were.
fn advance_round(
    mut state: WorkoutState,
    exercises: &[Exercise],
    events: &mut TickEvents,
) -> WorkoutState {
    let previous_exercise = state.exercise_index;

    state.set_index += 1;
    if state.set_index > exercises[state.exercise_index].set_count {
        state.exercise_index += 1;
        state.set_index = 1;
    }

    let Some(exercise) = exercises.get(state.exercise_index) else {
        state.phase = Phase::Finished;
        events.push(WorkoutEvent::Finished);
        return state;
    };

    if state.exercise_index != previous_exercise {
        events.push(WorkoutEvent::start_exercise(exercise.name.as_str()));
    }

    state.workout_timer = exercise.workout_duration;
    state.rest_timer = exercise.rest_duration;
    state.phase = Phase::Workout;
    events.push(WorkoutEvent::sound(Sound::Start));
    events.push(WorkoutEvent::phase_changed(Phase::Workout));
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(name: &str, work: u32, rest: u32, sets: u32) -> Exercise {
        Exercise::new(name, work, rest, sets)
    }

    fn workout_state(exercise_index: usize, set_index: u32, workout_timer: u32) -> WorkoutState {
        WorkoutState {
            phase: Phase::Workout,
            exercise_index,
            set_index,
            workout_timer,
            rest_timer: 0,
        }
    }

    #[test]
    fn test_initial_state_non_empty() {
        let exercises = vec![exercise("Squats", 30, 15, 3)];
        let state = initial_state(&exercises);
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.exercise_index, 0);
        assert_eq!(state.set_index, 1);
        assert_eq!(state.workout_timer, 30);
        assert_eq!(state.rest_timer, READY_LEAD_IN);
    }

    #[test]
    fn test_initial_state_lead_in_ignores_rest_duration() {
        let exercises = vec![exercise("Squats", 30, 45, 3)];
        assert_eq!(initial_state(&exercises).rest_timer, READY_LEAD_IN);
        assert_eq!(initial_state_with_lead_in(&exercises, 4).rest_timer, 4);
    }

    #[test]
    fn test_initial_state_empty_is_finished() {
        let state = initial_state(&[]);
        assert_eq!(state, WorkoutState::finished());
    }

    #[test]
    fn test_ready_countdown_and_transition() {
        let exercises = vec![exercise("Jumping Jacks", 20, 10, 1)];
        let state = initial_state_with_lead_in(&exercises, 3);

        let (state, events) = tick(state, &exercises);
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.rest_timer, 2);
        assert_eq!(events, [WorkoutEvent::sound(Sound::AlmostStart)]);

        let (state, events) = tick(state, &exercises);
        assert_eq!(state.rest_timer, 1);
        assert_eq!(events, [WorkoutEvent::sound(Sound::AlmostStart)]);

        let (state, events) = tick(state, &exercises);
        assert_eq!(state.phase, Phase::Workout);
        assert_eq!(state.workout_timer, 20);
        assert_eq!(state.rest_timer, 10);
        assert_eq!(
            events,
            [
                WorkoutEvent::sound(Sound::Start),
                WorkoutEvent::phase_changed(Phase::Workout),
                WorkoutEvent::start_exercise("Jumping Jacks"),
            ]
        );
    }

    #[test]
    fn test_ready_outside_window_is_silent() {
        let exercises = vec![exercise("Plank", 20, 10, 1)];
        let state = initial_state(&exercises);
        let (state, events) = tick(state, &exercises);
        assert_eq!(state.rest_timer, 9);
        assert!(events.is_empty());
    }

    #[test]
    fn test_workout_almost_pause_window() {
        let exercises = vec![exercise("Plank", 5, 10, 2)];
        let mut state = workout_state(0, 1, 5);
        let mut cues = Vec::new();
        for _ in 0..4 {
            let (next, events) = tick(state, &exercises);
            cues.push((next.workout_timer, events.sounds().collect::<Vec<_>>()));
            state = next;
        }
        assert_eq!(
            cues,
            vec![
                (4, vec![]),
                (3, vec![Sound::AlmostPause]),
                (2, vec![Sound::AlmostPause]),
                (1, vec![Sound::AlmostPause]),
            ]
        );
    }

    #[test]
    fn test_workout_end_goes_to_rest() {
        let exercises = vec![exercise("Plank", 5, 10, 2)];
        let state = WorkoutState {
            rest_timer: 10,
            ..workout_state(0, 1, 1)
        };
        let (state, events) = tick(state, &exercises);
        assert_eq!(state.phase, Phase::Rest);
        assert_eq!(state.workout_timer, 1);
        assert_eq!(state.rest_timer, 10);
        assert_eq!(
            events,
            [
                WorkoutEvent::sound(Sound::Pause),
                WorkoutEvent::phase_changed(Phase::Rest),
            ]
        );
    }

    #[test]
    fn test_terminal_set_skips_rest() {
        let exercises = vec![exercise("Plank", 5, 10, 1)];
        let (state, events) = tick(workout_state(0, 1, 1), &exercises);
        assert_eq!(state.phase, Phase::Finished);
        assert_eq!(events, [WorkoutEvent::Finished]);
    }

    #[test]
    fn test_last_set_of_non_last_exercise_rests() {
        let exercises = vec![exercise("Squats", 5, 10, 2), exercise("Lunges", 5, 10, 2)];
        let (state, events) = tick(workout_state(0, 2, 1), &exercises);
        assert_eq!(state.phase, Phase::Rest);
        assert!(events.contains(&WorkoutEvent::phase_changed(Phase::Rest)));
    }

    #[test]
    fn test_non_last_set_of_last_exercise_rests() {
        let exercises = vec![exercise("Squats", 5, 10, 2), exercise("Lunges", 5, 10, 2)];
        let (state, _) = tick(workout_state(1, 1, 1), &exercises);
        assert_eq!(state.phase, Phase::Rest);
    }

    #[test]
    fn test_rest_end_starts_next_set_same_exercise() {
        let exercises = vec![exercise("Squats", 30, 10, 3)];
        let state = WorkoutState {
            phase: Phase::Rest,
            exercise_index: 0,
            set_index: 1,
            workout_timer: 1,
            rest_timer: 1,
        };
        let (state, events) = tick(state, &exercises);
        assert_eq!(state.phase, Phase::Workout);
        assert_eq!(state.set_index, 2);
        assert_eq!(state.workout_timer, 30);
        assert_eq!(state.rest_timer, 10);
        assert_eq!(
            events,
            [
                WorkoutEvent::sound(Sound::Start),
                WorkoutEvent::phase_changed(Phase::Workout),
            ]
        );
    }

    #[test]
    fn test_rest_end_starts_next_exercise() {
        let exercises = vec![exercise("Squats", 30, 10, 1), exercise("Push-ups", 25, 5, 2)];
        let state = WorkoutState {
            phase: Phase::Rest,
            exercise_index: 0,
            set_index: 1,
            workout_timer: 1,
            rest_timer: 1,
        };
        let (state, events) = tick(state, &exercises);
        assert_eq!(state.phase, Phase::Workout);
        assert_eq!(state.exercise_index, 1);
        assert_eq!(state.set_index, 1);
        assert_eq!(state.workout_timer, 25);
        assert_eq!(state.rest_timer, 5);
        assert_eq!(
            events,
            [
                WorkoutEvent::start_exercise("Push-ups"),
                WorkoutEvent::sound(Sound::Start),
                WorkoutEvent::phase_changed(Phase::Workout),
            ]
        );
    }

    #[test]
    fn test_rest_countdown_cues() {
        let exercises = vec![exercise("Squats", 30, 4, 2)];
        let state = WorkoutState {
            phase: Phase::Rest,
            exercise_index: 0,
            set_index: 1,
            workout_timer: 1,
            rest_timer: 4,
        };
        let (state, events) = tick(state, &exercises);
        assert_eq!(state.rest_timer, 3);
        assert_eq!(events, [WorkoutEvent::sound(Sound::AlmostStart)]);
    }

    #[test]
    fn test_zero_rest_takes_one_tick() {
        let exercises = vec![exercise("Squats", 2, 0, 2)];
        let state = WorkoutState {
            phase: Phase::Rest,
            exercise_index: 0,
            set_index: 1,
            workout_timer: 1,
            rest_timer: 0,
        };
        let (state, events) = tick(state, &exercises);
        assert_eq!(state.phase, Phase::Workout);
        assert_eq!(state.set_index, 2);
        assert!(events.contains(&WorkoutEvent::sound(Sound::Start)));
    }

    #[test]
    fn test_intermediate_beep_fires_once() {
        let exercises = vec![Exercise {
            intermediate_beep_offsets: [5].into_iter().collect(),
            ..exercise("Mountain Climbers", 10, 5, 1)
        }];
        let mut state = workout_state(0, 1, 10);
        let mut hits = Vec::new();
        while !state.is_finished() {
            let (next, events) = tick(state, &exercises);
            if events.sounds().any(|s| s == Sound::Intermediate) {
                hits.push(next.workout_timer);
            }
            state = next;
        }
        assert_eq!(hits, vec![5]);
    }

    #[test]
    fn test_finished_is_noop() {
        let exercises = vec![exercise("Squats", 5, 5, 1)];
        let mut state = workout_state(0, 1, 1);
        let (finished, _) = tick(state, &exercises);
        state = finished;
        for _ in 0..100 {
            let (next, events) = tick(state, &exercises);
            assert_eq!(next, finished);
            assert!(events.is_empty());
            state = next;
        }
    }

    #[test]
    fn test_is_terminal_round() {
        let exercises = vec![exercise("A", 5, 5, 2), exercise("B", 5, 5, 3)];
        assert!(!is_terminal_round(&workout_state(0, 2, 1), &exercises));
        assert!(!is_terminal_round(&workout_state(1, 2, 1), &exercises));
        assert!(is_terminal_round(&workout_state(1, 3, 1), &exercises));
        assert!(!is_terminal_round(&WorkoutState::finished(), &[]));
    }
}
