//! Metrics collection for `workout-clock`.
//!
//! Prometheus-compatible counters and gauges describing a running workout.
//! Exercise names come from user files and are sanitized before being used
//! as labels.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::clock::{Phase, Sound};
use crate::error::DriverError;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Maximum length for exercise name labels.
const MAX_EXERCISE_LABEL_LEN: usize = 64;

const PHASES: [Phase; 4] = [Phase::Ready, Phase::Workout, Phase::Rest, Phase::Finished];

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without
/// an HTTP endpoint.
///
/// # Errors
///
/// Returns [`DriverError::MetricsInit`] if the recorder or HTTP listener
/// cannot be installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), DriverError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| DriverError::MetricsInit(e.to_string()))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!("workout_clock_ticks_total", "Total number of clock ticks");
    describe_counter!(
        "workout_clock_sound_cues_total",
        "Sound cues emitted, by cue kind"
    );
    describe_counter!(
        "workout_clock_phase_transitions_total",
        "Phase transitions, by target phase"
    );
    describe_counter!(
        "workout_clock_exercises_started_total",
        "Exercises started, by exercise name"
    );
    describe_counter!(
        "workout_clock_workouts_finished_total",
        "Workouts that reached the finished phase"
    );
    describe_gauge!(
        "workout_clock_current_phase",
        "Currently active phase (1 = active)"
    );
    describe_histogram!(
        "workout_clock_tick_lag_ms",
        "Delay between the scheduled and actual tick time in milliseconds"
    );
    register_sound_series();
}

/// Exports every cue kind at zero so the series exist before the first cue.
fn register_sound_series() {
    for sound in Sound::ALL {
        counter!("workout_clock_sound_cues_total", "sound" => sound.as_str()).absolute(0);
    }
}

/// Records one clock tick.
pub fn record_tick() {
    counter!("workout_clock_ticks_total").increment(1);
}

/// Records how late a tick fired relative to its schedule.
pub fn record_tick_lag(lag: Duration) {
    histogram!("workout_clock_tick_lag_ms").record(lag.as_secs_f64() * 1000.0);
}

/// Records a sound cue.
pub fn record_sound(sound: Sound) {
    counter!("workout_clock_sound_cues_total", "sound" => sound.as_str()).increment(1);
}

/// Records a phase transition and flips the current-phase gauge.
pub fn record_phase(phase: Phase) {
    counter!("workout_clock_phase_transitions_total", "to" => phase.as_str()).increment(1);
    for other in PHASES {
        let value = if other == phase { 1.0 } else { 0.0 };
        gauge!("workout_clock_current_phase", "phase" => other.as_str()).set(value);
    }
}

/// Records an exercise start.
pub fn record_exercise_started(name: &str) {
    counter!(
        "workout_clock_exercises_started_total",
        "exercise" => sanitize_exercise_label(name)
    )
    .increment(1);
}

/// Records a finished workout.
pub fn record_finished() {
    counter!("workout_clock_workouts_finished_total").increment(1);
}

/// Sanitizes an exercise name for use as a metrics label.
///
/// Truncates to [`MAX_EXERCISE_LABEL_LEN`] characters and replaces any
/// characters invalid in Prometheus labels with underscores.
fn sanitize_exercise_label(name: &str) -> String {
    name.chars()
        .take(MAX_EXERCISE_LABEL_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
