//! Event sinks
//!
//! A sink is one collaborator of the running workout: audio, UI, animation
//! switching, logging. The driver pushes every clock event to every sink in
//! emission order and never waits on a sink's outcome, so `dispatch`
//! returns nothing and must not block for long.

use std::io::Write;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::clock::{Exercise, Phase, WorkoutEvent, WorkoutState};
use crate::observability::{Event, EventEmitter, metrics};

/// Consumer of clock events.
pub trait EventSink: Send + Sync {
    /// Handles one event. `state` is the state the event's tick produced.
    fn dispatch(&self, tick: u64, state: &WorkoutState, event: &WorkoutEvent);
}

// ============================================================================
// LogSink
// ============================================================================

/// Writes every event to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn dispatch(&self, tick: u64, state: &WorkoutState, event: &WorkoutEvent) {
        match event {
            WorkoutEvent::PlaySound { sound } => {
                debug!(tick, %sound, remaining = state.remaining(), "sound cue");
            }
            WorkoutEvent::PhaseChanged { phase } => {
                info!(
                    tick,
                    %phase,
                    exercise = state.exercise_index,
                    set = state.set_index,
                    "phase changed"
                );
            }
            WorkoutEvent::StartExercise { exercise_name } => {
                info!(tick, exercise = %exercise_name, "exercise started");
            }
            WorkoutEvent::Finished => info!(tick, "workout finished"),
        }
    }
}

// ============================================================================
// ConsoleSink
// ============================================================================

/// Human-readable progress lines, standing in for the visual UI.
///
/// Optionally rings the terminal bell on sound cues.
pub struct ConsoleSink {
    exercises: Arc<[Exercise]>,
    bell: bool,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("bell", &self.bell)
            .finish_non_exhaustive()
    }
}

impl ConsoleSink {
    /// Creates a sink writing to `writer`.
    #[must_use]
    pub fn new(exercises: Arc<[Exercise]>, bell: bool, writer: Box<dyn Write + Send>) -> Self {
        Self {
            exercises,
            bell,
            writer: Mutex::new(writer),
        }
    }

    /// Creates a sink writing to stdout.
    #[must_use]
    pub fn stdout(exercises: Arc<[Exercise]>, bell: bool) -> Self {
        Self::new(exercises, bell, Box::new(std::io::stdout()))
    }

    fn render(&self, tick: u64, state: &WorkoutState, event: &WorkoutEvent) -> String {
        let stamp = format_clock(tick);
        match event {
            WorkoutEvent::StartExercise { exercise_name } => format!(
                "{stamp} >> {exercise_name} (exercise {}/{})",
                state.exercise_index + 1,
                self.exercises.len()
            ),
            WorkoutEvent::PhaseChanged { phase: Phase::Workout } => {
                let sets = self
                    .exercises
                    .get(state.exercise_index)
                    .map_or(0, |e| e.set_count);
                format!(
                    "{stamp} WORK set {}/{sets} for {}s",
                    state.set_index, state.workout_timer
                )
            }
            WorkoutEvent::PhaseChanged { phase: Phase::Rest } => {
                format!("{stamp} REST for {}s", state.rest_timer)
            }
            WorkoutEvent::PhaseChanged { phase } => format!("{stamp} {phase}"),
            WorkoutEvent::PlaySound { sound } => {
                let bell = if self.bell { "\x07" } else { "" };
                format!("{bell}{stamp}    * {sound} ({}s)", state.remaining())
            }
            WorkoutEvent::Finished => format!("{stamp} DONE"),
        }
    }
}

impl EventSink for ConsoleSink {
    fn dispatch(&self, tick: u64, state: &WorkoutState, event: &WorkoutEvent) {
        let line = self.render(tick, state, event);
        if let Ok(mut w) = self.writer.lock() {
            let _ = writeln!(w, "{line}");
            let _ = w.flush();
        }
    }
}

/// Formats a tick count as `mm:ss`, assuming one tick per second.
#[must_use]
pub fn format_clock(tick: u64) -> String {
    format!("{:02}:{:02}", tick / 60, tick % 60)
}

// ============================================================================
// JsonlSink
// ============================================================================

/// Forwards events to the structured JSONL stream.
#[derive(Debug, Clone)]
pub struct JsonlSink {
    emitter: Arc<EventEmitter>,
}

impl JsonlSink {
    /// Creates a sink sharing `emitter` with the rest of the run.
    #[must_use]
    pub const fn new(emitter: Arc<EventEmitter>) -> Self {
        Self { emitter }
    }
}

impl EventSink for JsonlSink {
    fn dispatch(&self, tick: u64, state: &WorkoutState, event: &WorkoutEvent) {
        self.emitter.emit(Event::from_clock(tick, state, event));
    }
}

// ============================================================================
// ChannelSink
// ============================================================================

/// Forwards events over an unbounded channel to an embedding host.
///
/// A dropped receiver is ignored; the workout keeps running.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<(u64, WorkoutEvent)>,
}

impl ChannelSink {
    /// Creates a sink sending `(tick, event)` pairs to `tx`.
    #[must_use]
    pub const fn new(tx: mpsc::UnboundedSender<(u64, WorkoutEvent)>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn dispatch(&self, tick: u64, _state: &WorkoutState, event: &WorkoutEvent) {
        let _ = self.tx.send((tick, event.clone()));
    }
}

// ============================================================================
// MetricsSink
// ============================================================================

/// Records events as Prometheus metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsSink;

impl EventSink for MetricsSink {
    fn dispatch(&self, _tick: u64, _state: &WorkoutState, event: &WorkoutEvent) {
        match event {
            WorkoutEvent::PlaySound { sound } => metrics::record_sound(*sound),
            WorkoutEvent::PhaseChanged { phase } => metrics::record_phase(*phase),
            WorkoutEvent::StartExercise { exercise_name } => {
                metrics::record_exercise_started(exercise_name);
            }
            WorkoutEvent::Finished => {
                metrics::record_phase(Phase::Finished);
                metrics::record_finished();
            }
        }
    }
}
