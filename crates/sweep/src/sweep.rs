//! Warm-started temperature sweeps.
//!
//! # Algorithm
//!
//! The sweep samples each temperature of a [`Schedule`] in ascending order.
//! The first temperature starts every chain from the aligned configuration;
//! every later temperature starts each chain from that chain's final draw at
//! the previous temperature. Each temperature is reduced to one
//! [`TemperatureResult`](xy_core::TemperatureResult), which is appended to
//! the sink before the next temperature starts.
//!
//! Temperature `i` is sampled with seed `config.seed() + i`, so a sweep with
//! a deterministic sampler is reproducible.
//!
//! # Observer Events
//!
//! The sweep emits two [`Event`]s per temperature:
//!
//! - [`Event::Started`] — before the sampler runs
//! - [`Event::Completed`] — after the row has been persisted
//!
//! Observers can return [`Action::StopEarly`] from either event to end the
//! sweep with [`Status::StoppedByObserver`].
//!
//! # Failures
//!
//! Sampler, output and sink failures are fatal and are not retried. Rows
//! persisted before the failure stay in the sink.

mod action;
mod config;
mod error;
mod event;
mod schedule;
mod solution;
mod step;


pub use action::Action;
pub use config::{ConfigError, MIN_SAMPLING_DRAWS, SweepConfig};
pub use error::Error;
pub use event::Event;
pub use schedule::Schedule;
pub use solution::{Solution, Status};
pub use step::{Step, step};

use tracing::info;
use xy_core::{Observer, ResultSink, Sampler, TemperatureResult, WarmStart};

/// Runs the sweep over every temperature in the config's schedule.
///
/// Each row is appended to `sink` as soon as its temperature completes. The
/// observer receives an [`Event`] before and after each temperature.
///
/// # Errors
///
/// Returns an error if the config is unusable, or if the sampler, its output
/// or the sink fails. The sweep stops at the first error.
pub fn run<S, K, Obs>(
    sampler: &S,
    sink: &mut K,
    config: &SweepConfig,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    S: Sampler,
    K: ResultSink,
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    let count = config.schedule().len();
    let mut warm_start = config.initial_warm_start()?;
    let mut results = Vec::with_capacity(count);

    info!(
        dim_x = config.lattice().dim_x(),
        dim_y = config.lattice().dim_y(),
        chains = config.chain_count(),
        iterations = config.iteration_count(),
        temperatures = count,
        "starting sweep"
    );

    for (index, temperature) in config.schedule().iter().enumerate() {
        let started = Event::Started {
            index,
            count,
            temperature,
        };
        if let Some(Action::StopEarly) = observer.observe(&started) {
            return Ok(stopped(results, warm_start, index));
        }

        let Step { result, next } = step(sampler, config, temperature, index, warm_start)?;
        sink.append(&result)
            .map_err(|e| Error::sink(temperature, e))?;

        info!(
            temperature,
            energy_per_spin = result.mean_energy_per_spin,
            specific_heat = result.specific_heat,
            vortex_density = result.vortex_density,
            r_hat = result.r_hat,
            "temperature complete"
        );

        warm_start = next;
        let completed = Event::Completed {
            index,
            count,
            result: &result,
        };
        let action = observer.observe(&completed);
        results.push(result);

        if let Some(Action::StopEarly) = action {
            return Ok(stopped(results, warm_start, index + 1));
        }
    }

    info!(temperatures = count, "sweep complete");
    Ok(Solution {
        status: Status::Complete,
        results,
        warm_start,
        iters: count,
    })
}

/// Runs the sweep without observer support.
///
/// This is a convenience wrapper around [`run`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error if the config is unusable, or if the sampler, its output
/// or the sink fails.
pub fn run_unobserved<S, K>(
    sampler: &S,
    sink: &mut K,
    config: &SweepConfig,
) -> Result<Solution, Error>
where
    S: Sampler,
    K: ResultSink,
{
    run(sampler, sink, config, ())
}

fn stopped(results: Vec<TemperatureResult>, warm_start: WarmStart, iters: usize) -> Solution {
    info!(iters, "sweep stopped by observer");
    Solution {
        status: Status::StoppedByObserver,
        results,
        warm_start,
        iters,
    }
}
