//! Structured event stream for `workout-clock`.
//!
//! Discrete, typed events emitted while a workout runs. Events are
//! serialized as newline-delimited JSON (JSONL) and include a monotonically
//! increasing sequence number for ordering guarantees.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::clock::{Phase, Sound, WorkoutEvent, WorkoutState};

// ---------------------------------------------------------------------------
// Stop reason / summary
// ---------------------------------------------------------------------------

/// Why the host driver stopped ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The workout reached its terminal phase.
    Completed,
    /// The driver's cancellation token fired.
    Cancelled,
    /// Interrupted by SIGINT.
    Interrupted,
    /// Terminated by SIGTERM.
    Terminated,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Interrupted => "interrupted",
            Self::Terminated => "terminated",
        };
        f.write_str(s)
    }
}

/// Summary statistics emitted when the driver stops.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Ticks applied to the clock.
    pub ticks: u64,
    /// `PhaseChanged` events observed.
    pub phase_transitions: u64,
    /// `PlaySound` events observed.
    pub sound_cues: u64,
    /// `StartExercise` events observed.
    pub exercises_started: u64,
    /// Wall-clock time spent in the driver loop.
    pub elapsed_secs: f64,
}

impl RunSummary {
    /// Folds one clock event into the counters.
    pub fn record(&mut self, event: &WorkoutEvent) {
        match event {
            WorkoutEvent::PhaseChanged { .. } => self.phase_transitions += 1,
            WorkoutEvent::PlaySound { .. } => self.sound_cues += 1,
            WorkoutEvent::StartExercise { .. } => self.exercises_started += 1,
            WorkoutEvent::Finished => {}
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ticks={} transitions={} cues={} exercises={} elapsed={:.1}s",
            self.ticks,
            self.phase_transitions,
            self.sound_cues,
            self.exercises_started,
            self.elapsed_secs,
        )
    }
}

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted while a workout runs.
///
/// Each variant is tagged with `"type"` when serialized to JSON so consumers
/// can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The driver has loaded a workout and is about to tick.
    WorkoutStarted {
        /// When the driver started.
        timestamp: DateTime<Utc>,
        /// Identifier of this run.
        run_id: Uuid,
        /// Workout display name.
        workout_name: String,
        /// Number of exercises in the catalog.
        exercise_count: usize,
        /// Ticks the workout takes from start to finish.
        total_ticks: u64,
    },

    /// A new exercise became active.
    ExerciseStarted {
        /// When the event was dispatched.
        timestamp: DateTime<Utc>,
        /// Tick number (1-based) that produced the event.
        tick: u64,
        /// Name of the exercise.
        exercise_name: String,
        /// Zero-based index of the exercise.
        exercise_index: usize,
    },

    /// The workout entered a new phase.
    PhaseEntered {
        /// When the event was dispatched.
        timestamp: DateTime<Utc>,
        /// Tick number (1-based) that produced the event.
        tick: u64,
        /// Phase entered.
        phase: Phase,
        /// Zero-based index of the current exercise.
        exercise_index: usize,
        /// One-based set number.
        set_index: u32,
    },

    /// An audio cue fired.
    SoundCue {
        /// When the event was dispatched.
        timestamp: DateTime<Utc>,
        /// Tick number (1-based) that produced the event.
        tick: u64,
        /// Cue kind.
        sound: Sound,
        /// Seconds left on the active timer after the tick.
        remaining: u32,
    },

    /// The workout reached its terminal phase.
    WorkoutFinished {
        /// When the event was dispatched.
        timestamp: DateTime<Utc>,
        /// Tick number (1-based) that produced the event.
        tick: u64,
    },

    /// The driver stopped.
    DriverStopped {
        /// When the driver stopped.
        timestamp: DateTime<Utc>,
        /// Why it stopped.
        reason: StopReason,
        /// Run summary statistics.
        #[serde(skip_serializing_if = "Option::is_none")]
        summary: Option<RunSummary>,
    },
}

impl Event {
    /// Maps a clock event, with the state it produced, to a stream event.
    #[must_use]
    pub fn from_clock(tick: u64, state: &WorkoutState, event: &WorkoutEvent) -> Self {
        let timestamp = Utc::now();
        match event {
            WorkoutEvent::StartExercise { exercise_name } => Self::ExerciseStarted {
                timestamp,
                tick,
                exercise_name: exercise_name.clone(),
                exercise_index: state.exercise_index,
            },
            WorkoutEvent::PlaySound { sound } => Self::SoundCue {
                timestamp,
                tick,
                sound: *sound,
                remaining: state.remaining(),
            },
            WorkoutEvent::PhaseChanged { phase } => Self::PhaseEntered {
                timestamp,
                tick,
                phase: *phase,
                exercise_index: state.exercise_index,
                set_index: state.set_index,
            },
            WorkoutEvent::Finished => Self::WorkoutFinished { timestamp, tick },
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) atomically increments the sequence
/// counter, serializes the event as a single JSON line, and flushes the
/// underlying writer. Serialization or I/O failures are silently dropped
/// because observability must never stop a workout.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
