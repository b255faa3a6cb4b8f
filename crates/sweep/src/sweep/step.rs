use tracing::{debug, info};
use xy_core::{SampleRequest, Sampler, TemperatureResult, WarmStart};

use crate::aggregate::OutputError;

use super::{ConfigError, Error, SweepConfig};

/// The outcome of sampling one temperature.
#[derive(Debug, Clone)]
pub struct Step {
    pub result: TemperatureResult,

    /// Final draw of every chain, the warm start of the next temperature.
    pub next: WarmStart,
}

/// Samples and aggregates a single temperature.
///
/// The request is seeded with [`SweepConfig::seed_for`]`(index)` and starts
/// every chain from `warm_start`. Nothing is persisted.
///
/// # Errors
///
/// Returns [`Error::Config`] before the sampler runs if the temperature is
/// not finite and positive or `warm_start` does not fit `config`. Sampler
/// failures and malformed sampler output are returned as [`Error::Sampler`]
/// and [`Error::Output`].
pub fn step<S: Sampler>(
    sampler: &S,
    config: &SweepConfig,
    temperature: f64,
    index: usize,
    warm_start: WarmStart,
) -> Result<Step, Error> {
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(ConfigError::NonPositiveTemperature { index, temperature }.into());
    }
    config.check_warm_start(&warm_start)?;
    let aggregator = config.aggregator()?;

    let request = SampleRequest {
        lattice: config.lattice(),
        temperature,
        chain_count: config.chain_count(),
        iteration_count: config.iteration_count(),
        initial_state: warm_start,
        tuning: config.tuning(),
        seed: config.seed_for(index),
    };

    info!(index, temperature, "sampling");
    let output = sampler
        .run(&request)
        .map_err(|e| Error::sampler(temperature, e))?;
    debug!(
        index,
        draws_per_chain = output.energy_per_spin.draws_per_chain(),
        "sampler finished"
    );

    let output_error = |source| Error::Output {
        temperature,
        source,
    };
    let result = aggregator
        .aggregate(&request, &output)
        .map_err(output_error)?;
    let next = WarmStart::from_final_draws(&output.spins)
        .map_err(|e| output_error(OutputError::from(e)))?;

    Ok(Step { result, next })
}
