//! `run` command
//!
//! Drives a workout in real time until it finishes or a signal arrives.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::cli::Shutdown;
use crate::cli::args::RunArgs;
use crate::driver::{ConsoleSink, JsonlSink, LogSink, MetricsSink, WorkoutDriver, total_ticks};
use crate::error::WorkoutClockError;
use crate::observability::{Event, EventEmitter, StopReason, init_metrics};

use super::{load_workout, resolve_lead_in};

/// Runs the workout in `args.file`.
///
/// # Errors
///
/// Returns a config error if the workout file fails to load, an I/O error
/// if the events file cannot be created, or a driver error if the metrics
/// exporter cannot start.
pub async fn run(args: &RunArgs, quiet: bool, shutdown: Shutdown) -> Result<(), WorkoutClockError> {
    let loaded = load_workout(&args.file)?;
    let lead_in = resolve_lead_in(args.lead_in, &loaded.config)?;
    let exercises = loaded.exercises();

    if let Some(port) = args.metrics_port {
        init_metrics(Some(port))?;
        tracing::info!(port, "Prometheus metrics endpoint started");
    }

    let events_to_stdout = args.events.as_deref() == Some(Path::new("-"));
    let emitter = match args.events.as_deref() {
        None => None,
        Some(_) if events_to_stdout => Some(EventEmitter::stdout()),
        Some(path) => Some(EventEmitter::from_file(path)?),
    }
    .map(Arc::new);

    let mut driver = WorkoutDriver::new(Arc::clone(&exercises), args.tick)?
        .with_lead_in(lead_in)
        .with_cancellation(shutdown.token())
        .with_sink(LogSink)
        .with_sink(MetricsSink);
    if !quiet && !events_to_stdout {
        driver = driver.with_sink(ConsoleSink::stdout(Arc::clone(&exercises), args.bell));
    }
    if let Some(emitter) = &emitter {
        driver = driver.with_sink(JsonlSink::new(Arc::clone(emitter)));
        emitter.emit(Event::WorkoutStarted {
            timestamp: Utc::now(),
            run_id: Uuid::new_v4(),
            workout_name: loaded.config.name.clone(),
            exercise_count: exercises.len(),
            total_ticks: total_ticks(&exercises, lead_in),
        });
    }

    tracing::info!(
        workout = %loaded.config.name,
        exercises = exercises.len(),
        lead_in,
        "starting workout"
    );

    let mut outcome = driver.run().await;
    if outcome.reason == StopReason::Cancelled
        && let Some(reason) = shutdown.reason()
    {
        outcome.reason = reason;
    }

    if let Some(emitter) = &emitter {
        emitter.emit(Event::DriverStopped {
            timestamp: Utc::now(),
            reason: outcome.reason,
            summary: Some(outcome.summary.clone()),
        });
    }

    tracing::info!(
        reason = %outcome.reason,
        summary = %outcome.summary,
        "workout stopped"
    );
    Ok(())
}
