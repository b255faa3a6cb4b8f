//! Result sinks and reusable observers for XY-model temperature sweeps.
//!
//! # Modules
//!
//! - [`csv`] — [`CsvSink`], an append-only CSV [`ResultSink`]
//! - [`traits`] — Capability traits for reusable observers
//!   ([`HasProgress`], [`HasResult`], [`CanStopEarly`])
//!
//! # Observers
//!
//! - [`ProgressLogger`] — logs progress and per-temperature wall time
//! - [`StopOnWarning`] — stops a sweep after repeated convergence warnings
//!
//! [`ResultSink`]: xy_core::ResultSink
//! [`HasProgress`]: traits::HasProgress
//! [`HasResult`]: traits::HasResult
//! [`CanStopEarly`]: traits::CanStopEarly

pub mod csv;
pub mod traits;

mod progress;
mod stop;

pub use csv::{CsvError, CsvSink};
pub use progress::ProgressLogger;
pub use stop::StopOnWarning;
