//! Host driver
//!
//! Everything the pure clock leaves to its host: a periodic tick loop,
//! event dispatch to collaborators, and offline simulation.
//!
//! - [`WorkoutDriver`]: Ticks the clock on a `tokio` interval until finished or cancelled
//! - [`EventSink`]: Fire-and-forget consumer of clock events
//! - [`simulate`]: Runs a whole workout without sleeping

pub mod runner;
pub mod simulate;
pub mod sink;

pub use runner::{DriverOutcome, WorkoutDriver};
pub use simulate::{TimelineEntry, simulate, total_ticks};
pub use sink::{ChannelSink, ConsoleSink, EventSink, JsonlSink, LogSink, MetricsSink};
