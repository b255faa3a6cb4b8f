use std::f64::consts::PI;

use thiserror::Error;
use xy_core::{Lattice, LatticeError, Tuning, WarmStart};

use crate::{aggregate::Aggregator, vortex::VortexDetector};

use super::Schedule;

/// Fewest post-warmup draws per chain that split diagnostics can work with.
pub const MIN_SAMPLING_DRAWS: usize = 4;

/// Configuration for a temperature sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepConfig {
    lattice: Lattice,
    schedule: Schedule,
    chain_count: usize,
    iteration_count: usize,
    vorticity_sample_cap: usize,
    tuning: Tuning,
    r_hat_threshold: f64,
    vortex_threshold: f64,
    seed: u64,
}

/// Errors that can occur when validating a sweep configuration.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("lattice must be at least 2x2, got {dim_x}x{dim_y}")]
    LatticeTooSmall { dim_x: usize, dim_y: usize },

    #[error("chain_count must be at least 1")]
    ZeroChains,

    #[error(
        "{iterations} iterations leave {draws} sampling draws per chain, need at least {MIN_SAMPLING_DRAWS}"
    )]
    TooFewIterations { iterations: usize, draws: usize },

    #[error("vorticity_sample_cap must be at least 1")]
    ZeroVorticitySamples,

    #[error("temperature schedule is empty")]
    EmptySchedule,

    #[error("temperature {temperature} at index {index} must be finite and positive")]
    NonPositiveTemperature { index: usize, temperature: f64 },

    #[error("temperature at index {index} does not increase on the previous one")]
    NonAscendingSchedule { index: usize },

    #[error("warm start has {found} chains, expected {expected}")]
    WarmStartCardinality { expected: usize, found: usize },

    #[error("warm start is on a {found:?} lattice, expected {expected:?}")]
    WarmStartShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{name} must be finite and positive, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("adapt_delta must lie strictly between 0 and 1, got {0}")]
    InvalidAdaptDelta(f64),
}

impl From<LatticeError> for ConfigError {
    fn from(e: LatticeError) -> Self {
        Self::LatticeTooSmall {
            dim_x: e.dim_x,
            dim_y: e.dim_y,
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        let lattice = Lattice::square(4).unwrap();
        Self::new(lattice, Schedule::default())
    }
}

impl SweepConfig {
    /// Creates a config for `lattice` and `schedule` with default sampling
    /// parameters.
    ///
    /// The defaults are 4 chains of 5000 iterations, at most 1000 spin draws
    /// scanned for vortices, an R̂ threshold of 1.1, a vortex threshold of π,
    /// and seed 0.
    #[must_use]
    pub fn new(lattice: Lattice, schedule: Schedule) -> Self {
        Self {
            lattice,
            schedule,
            chain_count: 4,
            iteration_count: 5000,
            vorticity_sample_cap: 1000,
            tuning: Tuning::default(),
            r_hat_threshold: 1.1,
            vortex_threshold: PI,
            seed: 0,
        }
    }

    /// Sets the number of chains and the iterations per chain.
    ///
    /// The first half of the iterations is warmup; the rest are sampling
    /// draws.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no chains, or if the iterations leave
    /// fewer than [`MIN_SAMPLING_DRAWS`] sampling draws.
    pub fn with_chains(
        mut self,
        chain_count: usize,
        iteration_count: usize,
    ) -> Result<Self, ConfigError> {
        if chain_count == 0 {
            return Err(ConfigError::ZeroChains);
        }
        let draws = iteration_count - iteration_count / 2;
        if draws < MIN_SAMPLING_DRAWS {
            return Err(ConfigError::TooFewIterations {
                iterations: iteration_count,
                draws,
            });
        }
        self.chain_count = chain_count;
        self.iteration_count = iteration_count;
        Ok(self)
    }

    /// Sets how many flattened spin draws are scanned for vortices.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroVorticitySamples`] if `cap` is zero.
    pub fn with_vorticity_sample_cap(mut self, cap: usize) -> Result<Self, ConfigError> {
        if cap == 0 {
            return Err(ConfigError::ZeroVorticitySamples);
        }
        self.vorticity_sample_cap = cap;
        Ok(self)
    }

    /// Sets the sampler tuning.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAdaptDelta`] unless `adapt_delta` lies
    /// in `(0, 1)`.
    pub fn with_tuning(mut self, tuning: Tuning) -> Result<Self, ConfigError> {
        let delta = tuning.adapt_delta;
        if !(delta > 0.0 && delta < 1.0) {
            return Err(ConfigError::InvalidAdaptDelta(delta));
        }
        self.tuning = tuning;
        Ok(self)
    }

    /// Sets the R̂ value above which a result carries a convergence warning.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] unless `threshold` is finite
    /// and positive.
    pub fn with_r_hat_threshold(mut self, threshold: f64) -> Result<Self, ConfigError> {
        self.r_hat_threshold = positive_threshold("r_hat_threshold", threshold)?;
        Ok(self)
    }

    /// Sets the plaquette winding above which a vortex is counted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] unless `threshold` is finite
    /// and positive.
    pub fn with_vortex_threshold(mut self, threshold: f64) -> Result<Self, ConfigError> {
        self.vortex_threshold = positive_threshold("vortex_threshold", threshold)?;
        Ok(self)
    }

    /// Sets the base seed. Temperature `i` is sampled with `seed + i`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn lattice(&self) -> Lattice {
        self.lattice
    }

    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    #[must_use]
    pub fn chain_count(&self) -> usize {
        self.chain_count
    }

    #[must_use]
    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    #[must_use]
    pub fn vorticity_sample_cap(&self) -> usize {
        self.vorticity_sample_cap
    }

    #[must_use]
    pub fn tuning(&self) -> Tuning {
        self.tuning
    }

    #[must_use]
    pub fn r_hat_threshold(&self) -> f64 {
        self.r_hat_threshold
    }

    #[must_use]
    pub fn vortex_threshold(&self) -> f64 {
        self.vortex_threshold
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the seed for the temperature at `index`.
    #[must_use]
    pub fn seed_for(&self, index: usize) -> u64 {
        self.seed.wrapping_add(index as u64)
    }

    /// Returns the warm start of the first temperature: every chain aligned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroChains`] if the config has no chains.
    pub fn initial_warm_start(&self) -> Result<WarmStart, ConfigError> {
        WarmStart::aligned(self.lattice, self.chain_count).map_err(|_| ConfigError::ZeroChains)
    }

    /// Returns the aggregator for this config's thresholds and sample cap.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThreshold`] if the vortex threshold is
    /// unusable.
    pub fn aggregator(&self) -> Result<Aggregator, ConfigError> {
        let detector =
            VortexDetector::new(self.vortex_threshold).map_err(|e| ConfigError::InvalidThreshold {
                name: "vortex_threshold",
                value: e.0,
            })?;
        Ok(Aggregator::new(
            detector,
            self.vorticity_sample_cap,
            self.r_hat_threshold,
        ))
    }

    /// Checks that `warm_start` fits this config's chains and lattice.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain count or lattice shape differs.
    pub fn check_warm_start(&self, warm_start: &WarmStart) -> Result<(), ConfigError> {
        if warm_start.chain_count() != self.chain_count {
            return Err(ConfigError::WarmStartCardinality {
                expected: self.chain_count,
                found: warm_start.chain_count(),
            });
        }
        if warm_start.lattice() != self.lattice {
            return Err(ConfigError::WarmStartShape {
                expected: self.lattice.shape(),
                found: warm_start.lattice().shape(),
            });
        }
        Ok(())
    }
}

fn positive_threshold(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::InvalidThreshold { name, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_study() {
        let config = SweepConfig::default();

        assert_eq!(config.lattice().shape(), (4, 4));
        assert_eq!(config.chain_count(), 4);
        assert_eq!(config.iteration_count(), 5000);
        assert_eq!(config.vorticity_sample_cap(), 1000);
        assert_eq!(config.tuning(), Tuning::default());
        assert_eq!(config.schedule().len(), 20);
        assert_eq!(config.r_hat_threshold(), 1.1);
        assert_eq!(config.vortex_threshold(), PI);
        assert_eq!(config.seed(), 0);
    }

    #[test]
    fn rejects_each_invalid_setting() {
        let config = SweepConfig::default();

        assert_eq!(
            config.clone().with_chains(0, 10),
            Err(ConfigError::ZeroChains)
        );
        assert_eq!(
            config.clone().with_chains(4, 0),
            Err(ConfigError::TooFewIterations {
                iterations: 0,
                draws: 0
            })
        );
        // Six iterations keep three draws after warmup, seven keep four.
        assert_eq!(
            config.clone().with_chains(4, 6),
            Err(ConfigError::TooFewIterations {
                iterations: 6,
                draws: 3
            })
        );
        assert!(config.clone().with_chains(4, 7).is_ok());
        assert_eq!(
            config.clone().with_vorticity_sample_cap(0),
            Err(ConfigError::ZeroVorticitySamples)
        );
        assert!(matches!(
            config.clone().with_r_hat_threshold(f64::NAN),
            Err(ConfigError::InvalidThreshold {
                name: "r_hat_threshold",
                ..
            })
        ));
        assert!(matches!(
            config.clone().with_vortex_threshold(-1.0),
            Err(ConfigError::InvalidThreshold {
                name: "vortex_threshold",
                ..
            })
        ));
        assert_eq!(
            config.clone().with_tuning(Tuning {
                adapt_delta: 1.0,
                max_tree_depth: 15
            }),
            Err(ConfigError::InvalidAdaptDelta(1.0))
        );
    }

    #[test]
    fn lattice_errors_convert() {
        let error: ConfigError = Lattice::new(1, 3).unwrap_err().into();

        assert_eq!(error, ConfigError::LatticeTooSmall { dim_x: 1, dim_y: 3 });
    }

    #[test]
    fn seeds_advance_per_temperature() {
        let config = SweepConfig::default().with_seed(u64::MAX);

        assert_eq!(config.seed_for(0), u64::MAX);
        assert_eq!(config.seed_for(1), 0);
    }

    #[test]
    fn warm_start_must_match_chains_and_lattice() {
        let config = SweepConfig::default();
        let lattice = config.lattice();

        assert_eq!(config.check_warm_start(&config.initial_warm_start().unwrap()), Ok(()));
        assert_eq!(
            config.check_warm_start(&WarmStart::aligned(lattice, 2).unwrap()),
            Err(ConfigError::WarmStartCardinality {
                expected: 4,
                found: 2
            })
        );
        assert_eq!(
            config.check_warm_start(&WarmStart::aligned(Lattice::square(3).unwrap(), 4).unwrap()),
            Err(ConfigError::WarmStartShape {
                expected: (4, 4),
                found: (3, 3)
            })
        );
    }
}
