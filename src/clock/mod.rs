//! Workout clock
//!
//! A pure, tick-driven state machine for timed multi-exercise, multi-set
//! workouts. Each call to [`tick`] maps the current [`WorkoutState`] and the
//! immutable exercise list to the next state plus the ordered events the
//! host must dispatch.
//!
//! # Architecture
//!
//! - [`WorkoutState`]: The only mutable-by-replacement state (phase, indices, timers)
//! - [`engine`]: Phase dispatch, per-phase handlers and round advancement
//! - [`cue`]: Sound-cue derivation from post-decrement timer values
//! - [`TickEvents`]: Ordered per-tick event sequence
//!
//! The clock performs no I/O and never logs; the host driver in
//! [`crate::driver`] owns timing, logging and event dispatch.

pub mod cue;
pub mod engine;
pub mod event;
pub mod state;

pub use engine::{initial_state, initial_state_with_lead_in, tick};
pub use event::{Sound, TickEvents, WorkoutEvent};
pub use state::{Phase, READY_LEAD_IN, WorkoutState};

pub use crate::config::schema::Exercise;
