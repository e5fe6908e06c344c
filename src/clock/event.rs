//! Events emitted by the workout clock
//!
//! Events are output-only: the clock returns them from [`tick`](super::tick)
//! and never stores them. Emission order within a tick is part of the
//! contract, so the per-tick output is the [`TickEvents`] sequence rather
//! than a bare `Vec`.

use serde::Serialize;

use super::state::Phase;

/// One of the five fixed audio cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sound {
    /// A work interval begins.
    Start,
    /// A work interval ends.
    Pause,
    /// Lead-in or rest is about to end.
    AlmostStart,
    /// Work interval is about to end.
    AlmostPause,
    /// Configured mid-interval beep.
    Intermediate,
}

impl Sound {
    /// All cue kinds, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Start,
        Self::Pause,
        Self::AlmostStart,
        Self::AlmostPause,
        Self::Intermediate,
    ];

    /// Returns the cue name as used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::AlmostStart => "almost_start",
            Self::AlmostPause => "almost_pause",
            Self::Intermediate => "intermediate",
        }
    }
}

impl std::fmt::Display for Sound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A side effect the host must dispatch to its collaborators.
///
/// Serialized with a `"type"` tag so JSONL consumers can dispatch on kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkoutEvent {
    /// Switch the visual animation to the named exercise.
    StartExercise {
        /// Name of the exercise now active.
        exercise_name: String,
    },
    /// Play an audio cue.
    PlaySound {
        /// Which cue to play.
        sound: Sound,
    },
    /// The workout moved to a new phase.
    PhaseChanged {
        /// Phase just entered.
        phase: Phase,
    },
    /// The workout is complete; the host should stop ticking.
    Finished,
}

impl WorkoutEvent {
    /// Convenience constructor for [`WorkoutEvent::StartExercise`].
    #[must_use]
    pub fn start_exercise(name: impl Into<String>) -> Self {
        Self::StartExercise {
            exercise_name: name.into(),
        }
    }

    /// Convenience constructor for [`WorkoutEvent::PlaySound`].
    #[must_use]
    pub const fn sound(sound: Sound) -> Self {
        Self::PlaySound { sound }
    }

    /// Convenience constructor for [`WorkoutEvent::PhaseChanged`].
    #[must_use]
    pub const fn phase_changed(phase: Phase) -> Self {
        Self::PhaseChanged { phase }
    }
}

impl std::fmt::Display for WorkoutEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartExercise { exercise_name } => write!(f, "start exercise '{exercise_name}'"),
            Self::PlaySound { sound } => write!(f, "play {sound}"),
            Self::PhaseChanged { phase } => write!(f, "phase -> {phase}"),
            Self::Finished => f.write_str("finished"),
        }
    }
}

/// Ordered events produced by a single tick.
///
/// Events only ever get appended; consumers iterate in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TickEvents(Vec<WorkoutEvent>);

impl TickEvents {
    /// Creates an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends an event after all previously emitted ones.
    pub fn push(&mut self, event: WorkoutEvent) {
        self.0.push(event);
    }

    /// Number of events emitted this tick.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the tick emitted nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the events in emission order.
    #[must_use]
    pub fn as_slice(&self) -> &[WorkoutEvent] {
        &self.0
    }

    /// Iterates the events in emission order.
    pub fn iter(&self) -> std::slice::Iter<'_, WorkoutEvent> {
        self.0.iter()
    }

    /// Returns `true` if any event in this tick is `event`.
    #[must_use]
    pub fn contains(&self, event: &WorkoutEvent) -> bool {
        self.0.contains(event)
    }

    /// Sound cues emitted this tick, in order.
    pub fn sounds(&self) -> impl Iterator<Item = Sound> + '_ {
        self.0.iter().filter_map(|e| match e {
            WorkoutEvent::PlaySound { sound } => Some(*sound),
            _ => None,
        })
    }
}

impl From<Vec<WorkoutEvent>> for TickEvents {
    fn from(events: Vec<WorkoutEvent>) -> Self {
        Self(events)
    }
}

impl IntoIterator for TickEvents {
    type Item = WorkoutEvent;
    type IntoIter = std::vec::IntoIter<WorkoutEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TickEvents {
    type Item = &'a WorkoutEvent;
    type IntoIter = std::slice::Iter<'a, WorkoutEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl PartialEq<[WorkoutEvent]> for TickEvents {
    fn eq(&self, other: &[WorkoutEvent]) -> bool {
        self.0.as_slice() == other
    }
}

impl<const N: usize> PartialEq<[WorkoutEvent; N]> for TickEvents {
    fn eq(&self, other: &[WorkoutEvent; N]) -> bool {
        self.0.as_slice() == other.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_value(WorkoutEvent::start_exercise("Squats")).unwrap();
        assert_eq!(json["type"], "start_exercise");
        assert_eq!(json["exercise_name"], "Squats");

        let json = serde_json::to_value(WorkoutEvent::sound(Sound::AlmostPause)).unwrap();
        assert_eq!(json["type"], "play_sound");
        assert_eq!(json["sound"], "almost_pause");

        let json = serde_json::to_value(WorkoutEvent::Finished).unwrap();
        assert_eq!(json["type"], "finished");
    }

    #[test]
    fn test_tick_events_preserve_order() {
        let mut events = TickEvents::new();
        assert!(events.is_empty());

        events.push(WorkoutEvent::sound(Sound::Start));
        events.push(WorkoutEvent::phase_changed(Phase::Workout));
        events.push(WorkoutEvent::start_exercise("Plank"));

        assert_eq!(events.len(), 3);
        assert_eq!(
            events,
            [
                WorkoutEvent::sound(Sound::Start),
                WorkoutEvent::phase_changed(Phase::Workout),
                WorkoutEvent::start_exercise("Plank"),
            ]
        );
    }

    #[test]
    fn test_sounds_filters_play_sound_events() {
        let events = TickEvents::from(vec![
            WorkoutEvent::start_exercise("Plank"),
            WorkoutEvent::sound(Sound::Start),
            WorkoutEvent::phase_changed(Phase::Workout),
        ]);
        assert_eq!(events.sounds().collect::<Vec<_>>(), vec![Sound::Start]);
    }

    #[test]
    fn test_tick_events_serialize_as_array() {
        let events = TickEvents::from(vec![WorkoutEvent::Finished]);
        let json = serde_json::to_string(&events).unwrap();
        assert_eq!(json, r#"[{"type":"finished"}]"#);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(
            WorkoutEvent::start_exercise("Lunges").to_string(),
            "start exercise 'Lunges'"
        );
        assert_eq!(
            WorkoutEvent::sound(Sound::Intermediate).to_string(),
            "play intermediate"
        );
        assert_eq!(
            WorkoutEvent::phase_changed(Phase::Rest).to_string(),
            "phase -> rest"
        );
    }
}
