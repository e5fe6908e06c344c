//! Periodic tick loop
//!
//! [`WorkoutDriver`] owns the only copy of the [`WorkoutState`] and applies
//! exactly one tick per period, so ticks for the same workout never overlap.
//! Stopping is cooperative through a [`CancellationToken`]; there is no
//! in-flight work to abort.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::clock::{self, Exercise, READY_LEAD_IN, WorkoutState};
use crate::error::DriverError;
use crate::observability::{RunSummary, StopReason, metrics};

use super::sink::EventSink;

/// Result of a driver run.
#[derive(Debug, Clone)]
pub struct DriverOutcome {
    /// Last state the clock produced.
    pub final_state: WorkoutState,
    /// Counters collected during the run.
    pub summary: RunSummary,
    /// Why the loop ended.
    pub reason: StopReason,
}

/// Drives the workout clock in real time.
pub struct WorkoutDriver {
    exercises: Arc<[Exercise]>,
    state: WorkoutState,
    period: Duration,
    sinks: Vec<Box<dyn EventSink>>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for WorkoutDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkoutDriver")
            .field("state", &self.state)
            .field("period", &self.period)
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl WorkoutDriver {
    /// Creates a driver ticking every `period`, starting from the default
    /// initial state.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidTickPeriod`] if `period` is zero.
    pub fn new(exercises: Arc<[Exercise]>, period: Duration) -> Result<Self, DriverError> {
        if period.is_zero() {
            return Err(DriverError::InvalidTickPeriod(
                "tick period must be greater than zero".to_string(),
            ));
        }
        let state = clock::initial_state_with_lead_in(&exercises, READY_LEAD_IN);
        Ok(Self {
            exercises,
            state,
            period,
            sinks: Vec::new(),
            cancel: CancellationToken::new(),
        })
    }

    /// Restarts from an initial state with the given lead-in.
    #[must_use]
    pub fn with_lead_in(mut self, lead_in: u32) -> Self {
        self.state = clock::initial_state_with_lead_in(&self.exercises, lead_in);
        self
    }

    /// Registers a sink. Sinks receive events in registration order.
    #[must_use]
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Uses an externally owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a handle that stops the loop when cancelled.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Current clock state.
    #[must_use]
    pub const fn state(&self) -> WorkoutState {
        self.state
    }

    /// Ticks until the workout finishes or the token is cancelled.
    ///
    /// The first tick fires one period after the call. Missed ticks are
    /// delayed rather than replayed in a burst.
    pub async fn run(mut self) -> DriverOutcome {
        let started = Instant::now();
        let mut summary = RunSummary::default();

        let cancel = self.cancel.clone();
        let mut interval = time::interval_at(started + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            exercises = self.exercises.len(),
            period_ms = u64::try_from(self.period.as_millis()).unwrap_or(u64::MAX),
            "workout driver started"
        );

        let reason = loop {
            if self.state.is_finished() {
                break StopReason::Completed;
            }
            tokio::select! {
                biased;
                () = cancel.cancelled() => break StopReason::Cancelled,
                scheduled = interval.tick() => {
                    metrics::record_tick_lag(scheduled.elapsed());
                    self.step(&mut summary);
                }
            }
        };

        summary.elapsed_secs = started.elapsed().as_secs_f64();
        info!(%reason, %summary, "workout driver stopped");

        DriverOutcome {
            final_state: self.state,
            summary,
            reason,
        }
    }

    /// Applies one tick and fans its events out to every sink.
    fn step(&mut self, summary: &mut RunSummary) {
        let (next, events) = clock::tick(self.state, &self.exercises);
        summary.ticks += 1;
        metrics::record_tick();

        if next.phase != self.state.phase {
            debug!(
                tick = summary.ticks,
                from = %self.state.phase,
                to = %next.phase,
                "phase transition"
            );
        }
        trace!(tick = summary.ticks, state = ?next, events = events.len(), "tick");

        self.state = next;
        for event in &events {
            summary.record(event);
            for sink in &self.sinks {
                sink.dispatch(summary.ticks, &self.state, event);
            }
        }
    }
}
