//! Single-site Metropolis sampler backend for the XY model.
//!
//! # Algorithm
//!
//! Every chain runs `iteration_count` sweeps from its initial configuration.
//! A sweep makes one proposal per site: a random site's angle is shifted by
//! `U(-δ, δ)` and accepted with probability `min(1, exp(-ΔE / T))`.
//!
//! - **Warmup**: the first `iteration_count / 2` sweeps adapt `δ` toward the
//!   requested acceptance rate (`adapt_delta`) and are discarded.
//! - **Sampling**: every remaining sweep records one draw of the energy, the
//!   energy per spin and the spin configuration.
//!
//! Chains run in parallel. Chain `c` draws from stream `c` of a
//! [`ChaCha8Rng`](rand_chacha::ChaCha8Rng) seeded with the request seed, so
//! results do not depend on thread scheduling.
//!
//! # Diagnostics
//!
//! Energy and energy-per-spin summaries carry split-R̂ and a multi-chain
//! effective sample size; see [`diagnostics`].
//!
//! # Limitations
//!
//! `max_tree_depth` has no Metropolis counterpart and is ignored.

mod chain;
pub mod diagnostics;
pub mod energy;

use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;
use xy_core::{
    Diagnostics, Draws, DrawsError, Observable, SampleRequest, Sampler, SamplerOutput, SpinError,
};

use chain::{Chain, ChainDraws};

/// Fewest sampling draws per chain that split diagnostics can work with.
pub const MIN_DRAWS: usize = 4;

/// Errors returned by [`MetropolisSampler`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("temperature must be finite and positive, got {0}")]
    Temperature(f64),

    #[error("at least one chain is required")]
    NoChains,

    #[error("initial state has {found} chains, expected {expected}")]
    InitialStateCardinality { expected: usize, found: usize },

    #[error("initial state is on a {found:?} lattice, expected {expected:?}")]
    InitialStateShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{iterations} iterations leave {draws} draws per chain, need at least {MIN_DRAWS}")]
    TooFewIterations { iterations: usize, draws: usize },

    #[error("adapt_delta must lie strictly between 0 and 1, got {0}")]
    AdaptDelta(f64),

    #[error(transparent)]
    Draws(#[from] DrawsError),

    #[error(transparent)]
    Spin(#[from] SpinError),
}

/// A [`Sampler`] that runs single-site Metropolis chains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetropolisSampler {
    initial_step: f64,
}

impl Default for MetropolisSampler {
    fn default() -> Self {
        Self { initial_step: 1.0 }
    }
}

impl MetropolisSampler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the proposal half-width every chain starts warmup with.
    ///
    /// The value is clamped to `[1e-3, π]`.
    #[must_use]
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step.clamp(chain::MIN_STEP, chain::MAX_STEP);
        self
    }

    /// Checks that `request` can be sampled.
    ///
    /// # Errors
    ///
    /// Returns the first problem found with the request.
    pub fn validate(&self, request: &SampleRequest) -> Result<(), Error> {
        let temperature = request.temperature;
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(Error::Temperature(temperature));
        }
        if request.chain_count == 0 {
            return Err(Error::NoChains);
        }

        let initial = &request.initial_state;
        if initial.chain_count() != request.chain_count {
            return Err(Error::InitialStateCardinality {
                expected: request.chain_count,
                found: initial.chain_count(),
            });
        }
        if initial.lattice() != request.lattice {
            return Err(Error::InitialStateShape {
                expected: request.lattice.shape(),
                found: initial.lattice().shape(),
            });
        }

        let draws = sampling_sweeps(request.iteration_count);
        if draws < MIN_DRAWS {
            return Err(Error::TooFewIterations {
                iterations: request.iteration_count,
                draws,
            });
        }

        let delta = request.tuning.adapt_delta;
        if !(delta > 0.0 && delta < 1.0) {
            return Err(Error::AdaptDelta(delta));
        }
        Ok(())
    }
}

impl Sampler for MetropolisSampler {
    type Error = Error;

    fn run(&self, request: &SampleRequest) -> Result<SamplerOutput, Self::Error> {
        self.validate(request)?;
        debug!(
            max_tree_depth = request.tuning.max_tree_depth,
            "max_tree_depth does not apply to metropolis and is ignored"
        );

        let warmup = request.iteration_count / 2;
        let sweeps = sampling_sweeps(request.iteration_count);

        let chains = request
            .initial_state
            .configurations()
            .par_iter()
            .enumerate()
            .map(|(c, initial)| {
                let mut chain = Chain::new(
                    initial,
                    request.temperature,
                    self.initial_step,
                    request.seed,
                    c as u64,
                );
                chain.warmup(warmup, request.tuning.adapt_delta);
                chain.sample(sweeps)
            })
            .collect::<Result<Vec<ChainDraws>, SpinError>>()?;

        for (c, chain) in chains.iter().enumerate() {
            debug!(
                chain = c,
                temperature = request.temperature,
                acceptance = chain.acceptance,
                step = chain.step,
                "chain finished"
            );
        }

        assemble(chains)
    }
}

fn sampling_sweeps(iteration_count: usize) -> usize {
    iteration_count - iteration_count / 2
}

fn assemble(chains: Vec<ChainDraws>) -> Result<SamplerOutput, Error> {
    let mut energy = Vec::with_capacity(chains.len());
    let mut energy_per_spin = Vec::with_capacity(chains.len());
    let mut spins = Vec::with_capacity(chains.len());
    for chain in chains {
        energy.push(chain.energy);
        energy_per_spin.push(chain.energy_per_spin);
        spins.push(chain.spins);
    }

    let energy = Draws::from_chains(energy)?;
    let energy_per_spin = Draws::from_chains(energy_per_spin)?;

    let diagnostics: Diagnostics = [
        (Observable::Energy, &energy),
        (Observable::EnergyPerSpin, &energy_per_spin),
    ]
    .into_iter()
    .map(|(observable, draws)| {
        let views: Vec<&[f64]> = draws.chains().collect();
        (observable, diagnostics::summarize(&views))
    })
    .collect();

    Ok(SamplerOutput {
        energy,
        energy_per_spin,
        spins: Draws::from_chains(spins)?,
        diagnostics,
    })
}
