//! Vortex detection, observable aggregation and warm-started temperature
//! sweeps for the two-dimensional XY model.
//!
//! The entry point is [`sweep::run`], which drives any [`xy_core::Sampler`]
//! across a [`Schedule`] and appends one row per temperature to an
//! [`xy_core::ResultSink`].

pub mod aggregate;
pub mod stats;
pub mod sweep;
pub mod vortex;

pub use aggregate::{Aggregator, OutputError};
pub use sweep::{
    Action, ConfigError, Error, Event, MIN_SAMPLING_DRAWS, Schedule, Solution, Status, Step,
    SweepConfig, run, run_unobserved, step,
};
pub use vortex::{ThresholdError, VortexDetector};
