//! Core types and capability traits for XY-model temperature sweeps.
//!
//! This crate defines the shared abstractions the sweep, its samplers, and
//! its sinks build on:
//!
//! - [`Lattice`] — a periodic 2D grid and its plaquette geometry
//! - [`Spin`], [`SpinConfiguration`] — unit planar spins on every site
//! - [`Draws`] — Monte Carlo draws grouped by chain
//! - [`Sampler`] — an opaque Monte Carlo engine driven by a [`SampleRequest`]
//! - [`ResultSink`] — an append-only destination for [`TemperatureResult`]s
//! - [`Observer`] — receives sweep events and optionally returns control actions

mod draws;
mod observer;
mod output;
mod result;
mod sampler;
mod sink;
mod warm_start;

pub mod lattice;
pub mod spin;

pub use draws::{Draws, DrawsError};
pub use lattice::{Corner, Lattice, LatticeError, Site};
pub use observer::Observer;
pub use output::{Diagnostics, Observable, SamplerOutput, Summary, UnknownObservable};
pub use result::{ConvergenceWarning, TemperatureResult};
pub use sampler::{SampleRequest, Sampler, Tuning};
pub use sink::ResultSink;
pub use spin::{Spin, SpinConfiguration, SpinError};
pub use warm_start::{WarmStart, WarmStartError};
