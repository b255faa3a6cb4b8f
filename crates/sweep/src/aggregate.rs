//! Reduction of sampler output to one [`TemperatureResult`].

use thiserror::Error;
use tracing::warn;
use xy_core::{
    ConvergenceWarning, Draws, Observable, SampleRequest, SamplerOutput, SpinConfiguration,
    TemperatureResult, WarmStartError,
};

use crate::{stats, vortex::VortexDetector};

/// Errors raised when sampler output violates the sampler contract.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OutputError {
    #[error("{observable} series has {found} chains, expected {expected}")]
    ChainCount {
        observable: Observable,
        expected: usize,
        found: usize,
    },

    #[error("{observable} series has {found} draws per chain, expected {expected}")]
    DrawCount {
        observable: Observable,
        expected: usize,
        found: usize,
    },

    #[error("spin draw is on a {found:?} lattice, expected {expected:?}")]
    SpinShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("diagnostics have no entry for {0}")]
    MissingDiagnostic(Observable),

    #[error("variance needs at least 2 draws, got {0}")]
    TooFewDraws(usize),

    #[error("final draws do not form a warm start: {0}")]
    WarmStart(#[from] WarmStartError),
}

/// Reduces sampler output to summary statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregator {
    detector: VortexDetector,
    vorticity_sample_cap: usize,
    r_hat_threshold: f64,
}

impl Aggregator {
    /// Creates an aggregator.
    ///
    /// At most `vorticity_sample_cap` flattened spin draws are scanned for
    /// vortices; a cap of zero is treated as one. Results whose R̂ exceeds
    /// `r_hat_threshold` carry a [`ConvergenceWarning`].
    #[must_use]
    pub fn new(
        detector: VortexDetector,
        vorticity_sample_cap: usize,
        r_hat_threshold: f64,
    ) -> Self {
        Self {
            detector,
            vorticity_sample_cap: vorticity_sample_cap.max(1),
            r_hat_threshold,
        }
    }

    #[must_use]
    pub fn detector(&self) -> &VortexDetector {
        &self.detector
    }

    #[must_use]
    pub fn vorticity_sample_cap(&self) -> usize {
        self.vorticity_sample_cap
    }

    /// Checks that `output` has the shape `request` asked for.
    ///
    /// Every series must hold one chain per requested chain, all series must
    /// agree on the draws per chain, and every spin draw must be on the
    /// requested lattice.
    ///
    /// # Errors
    ///
    /// Returns the first [`OutputError`] found.
    pub fn validate(
        &self,
        request: &SampleRequest,
        output: &SamplerOutput,
    ) -> Result<(), OutputError> {
        let expected_chains = request.chain_count;
        let expected_draws = output.energy_per_spin.draws_per_chain();

        let shapes = [
            (
                Observable::Energy,
                output.energy.chain_count(),
                output.energy.draws_per_chain(),
            ),
            (
                Observable::EnergyPerSpin,
                output.energy_per_spin.chain_count(),
                output.energy_per_spin.draws_per_chain(),
            ),
            (
                Observable::Spin,
                output.spins.chain_count(),
                output.spins.draws_per_chain(),
            ),
        ];
        for (observable, chains, draws) in shapes {
            if chains != expected_chains {
                return Err(OutputError::ChainCount {
                    observable,
                    expected: expected_chains,
                    found: chains,
                });
            }
            if draws != expected_draws {
                return Err(OutputError::DrawCount {
                    observable,
                    expected: expected_draws,
                    found: draws,
                });
            }
        }

        let lattice = request.lattice;
        if let Some(config) = output.spins.flattened().find(|c| c.lattice() != lattice) {
            return Err(OutputError::SpinShape {
                expected: lattice.shape(),
                found: config.lattice().shape(),
            });
        }
        Ok(())
    }

    /// Aggregates validated sampler output for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output is malformed, lacks an `energy_per_spin`
    /// diagnostic, or holds fewer than two draws.
    pub fn aggregate(
        &self,
        request: &SampleRequest,
        output: &SamplerOutput,
    ) -> Result<TemperatureResult, OutputError> {
        self.validate(request, output)?;

        let temperature = request.temperature;
        let sites = request.lattice.site_count() as f64;

        let energy_per_spin = output.energy_per_spin.to_flat_vec();
        let energy = output.energy.to_flat_vec();
        let (mean_energy_per_spin, energy_per_spin_variance) =
            mean_and_variance(&energy_per_spin)?;
        let (_, energy_variance) = mean_and_variance(&energy)?;

        let specific_heat = if temperature == 0.0 {
            f64::NAN
        } else {
            energy_variance / (sites * temperature * temperature)
        };

        let vortex_density = self.vortex_density(&output.spins) / sites;

        let summary = output
            .diagnostics
            .get(Observable::EnergyPerSpin)
            .ok_or(OutputError::MissingDiagnostic(Observable::EnergyPerSpin))?;

        let warning = self.check_convergence(summary.r_hat);
        if let Some(warning) = &warning {
            warn!(temperature, "{warning}");
        }

        Ok(TemperatureResult {
            temperature,
            dim_x: request.lattice.dim_x(),
            dim_y: request.lattice.dim_y(),
            mean_energy_per_spin,
            energy_per_spin_variance,
            specific_heat,
            vortex_density,
            r_hat: summary.r_hat,
            effective_sample_size: summary.effective_sample_size,
            warning,
        })
    }

    /// Returns a warning unless `r_hat` is finite and within the threshold.
    #[must_use]
    pub fn check_convergence(&self, r_hat: f64) -> Option<ConvergenceWarning> {
        if r_hat.is_finite() && r_hat <= self.r_hat_threshold {
            return None;
        }
        Some(ConvergenceWarning {
            r_hat,
            threshold: self.r_hat_threshold,
        })
    }

    /// Mean vortex count over the first `vorticity_sample_cap` flattened draws.
    fn vortex_density(&self, spins: &Draws<SpinConfiguration>) -> f64 {
        let counts = self
            .detector
            .count_batch(spins.flattened().take(self.vorticity_sample_cap));
        let total: usize = counts.iter().sum();
        total as f64 / counts.len() as f64
    }
}

fn mean_and_variance(values: &[f64]) -> Result<(f64, f64), OutputError> {
    match (stats::mean(values), stats::sample_variance(values)) {
        (Some(mean), Some(variance)) => Ok((mean, variance)),
        _ => Err(OutputError::TooFewDraws(values.len())),
    }
}
