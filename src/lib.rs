//! `workout-clock` - Tick-driven clock for timed interval workouts
//!
//! The [`clock`] module is a pure state machine: one call to
//! [`clock::tick`] per second advances the workout and returns the events
//! its collaborators react to. Everything else hosts it: loading workout
//! files, driving ticks in real time, and reporting what happened.

pub mod cli;
pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod observability;
