//! `simulate` command
//!
//! Fast-forwards a workout and prints its timeline without sleeping.

use std::io::Write;
use std::sync::Arc;

use serde::Serialize;

use crate::cli::args::{OutputFormat, SimulateArgs};
use crate::driver::sink::format_clock;
use crate::driver::{ConsoleSink, EventSink, TimelineEntry, simulate, total_ticks};
use crate::error::WorkoutClockError;

use super::{load_workout, resolve_lead_in};

#[derive(Debug, Serialize)]
struct SimulationReport<'a> {
    workout: &'a str,
    lead_in: u32,
    total_ticks: u64,
    timeline: &'a [TimelineEntry],
}

/// Simulates the workout in `args.file` and prints the result.
///
/// # Errors
///
/// Returns a config error if the workout file fails to load, or an
/// I/O or JSON error if output cannot be written.
pub fn run(args: &SimulateArgs) -> Result<(), WorkoutClockError> {
    let loaded = load_workout(&args.file)?;
    let lead_in = resolve_lead_in(args.lead_in, &loaded.config)?;
    let exercises = loaded.exercises();

    let timeline = simulate(&exercises, lead_in);
    let total = total_ticks(&exercises, lead_in);
    tracing::debug!(ticks = timeline.len(), total, "simulation complete");

    match args.format {
        OutputFormat::Human => {
            let console = ConsoleSink::stdout(Arc::clone(&exercises), false);
            for entry in &timeline {
                for event in &entry.events {
                    console.dispatch(entry.tick, &entry.state, event);
                }
            }
            let mut out = std::io::stdout().lock();
            writeln!(
                out,
                "{}: {} exercises, {total} ticks ({})",
                loaded.config.name,
                exercises.len(),
                format_clock(total)
            )?;
        }
        OutputFormat::Json => {
            let report = SimulationReport {
                workout: &loaded.config.name,
                lead_in,
                total_ticks: total,
                timeline: &timeline,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
