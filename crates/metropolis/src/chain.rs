use std::f64::consts::PI;

use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use xy_core::{Lattice, SpinConfiguration, SpinError};

use crate::energy::{delta_energy, total_energy};

/// Bounds on the proposal half-width.
pub const MIN_STEP: f64 = 1e-3;
pub const MAX_STEP: f64 = PI;

/// Draws recorded by one chain.
#[derive(Debug, Clone)]
pub struct ChainDraws {
    pub energy: Vec<f64>,
    pub energy_per_spin: Vec<f64>,
    pub spins: Vec<SpinConfiguration>,

    /// Fraction of accepted proposals while sampling.
    pub acceptance: f64,

    /// Proposal half-width after warmup.
    pub step: f64,
}

/// A single Metropolis chain over spin angles.
///
/// Each sweep makes one proposal per site, at a uniformly random site,
/// rotating the spin by `U(-step, step)`.
pub struct Chain {
    lattice: Lattice,
    beta: f64,
    angles: Array2<f64>,
    energy: f64,
    step: f64,
    rng: ChaCha8Rng,
}

impl Chain {
    /// Starts a chain from `initial`, drawing randomness from stream `stream`
    /// of the generator seeded with `seed`.
    pub fn new(
        initial: &SpinConfiguration,
        temperature: f64,
        step: f64,
        seed: u64,
        stream: u64,
    ) -> Self {
        let lattice = initial.lattice();
        let angles = initial.angles();
        let energy = total_energy(&lattice, &angles);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self {
            lattice,
            beta: 1.0 / temperature,
            angles,
            energy,
            step: step.clamp(MIN_STEP, MAX_STEP),
            rng,
        }
    }

    /// Runs one sweep and returns the fraction of accepted proposals.
    pub fn sweep(&mut self) -> f64 {
        let (dim_x, dim_y) = self.lattice.shape();
        let proposals = self.lattice.site_count();
        let mut accepted: u32 = 0;

        for _ in 0..proposals {
            let site = (self.rng.random_range(0..dim_x), self.rng.random_range(0..dim_y));
            let proposed =
                self.angles[[site.0, site.1]] + self.rng.random_range(-self.step..self.step);
            let delta = delta_energy(&self.lattice, &self.angles, site, proposed);

            if delta <= 0.0 || self.rng.random::<f64>() < (-self.beta * delta).exp() {
                self.angles[[site.0, site.1]] = wrap_angle(proposed);
                self.energy += delta;
                accepted += 1;
            }
        }

        f64::from(accepted) / proposals as f64
    }

    /// Runs `sweeps` warmup sweeps, steering the acceptance rate toward
    /// `target` by rescaling the step.
    pub fn warmup(&mut self, sweeps: usize, target: f64) {
        for _ in 0..sweeps {
            let acceptance = self.sweep();
            self.step = (self.step * (acceptance - target).exp()).clamp(MIN_STEP, MAX_STEP);
        }
        // Drop accumulated round-off before sampling.
        self.energy = total_energy(&self.lattice, &self.angles);
    }

    /// Runs `sweeps` sampling sweeps, recording one draw after each.
    pub fn sample(mut self, sweeps: usize) -> Result<ChainDraws, SpinError> {
        let sites = self.lattice.site_count() as f64;
        let mut draws = ChainDraws {
            energy: Vec::with_capacity(sweeps),
            energy_per_spin: Vec::with_capacity(sweeps),
            spins: Vec::with_capacity(sweeps),
            acceptance: 0.0,
            step: self.step,
        };

        let mut accepted = 0.0;
        for _ in 0..sweeps {
            accepted += self.sweep();
            draws.energy.push(self.energy);
            draws.energy_per_spin.push(self.energy / sites);
            draws.spins.push(SpinConfiguration::from_angles(&self.angles)?);
        }
        draws.acceptance = accepted / sweeps.max(1) as f64;
        Ok(draws)
    }
}

/// Wraps an angle into `[0, 2π)`.
fn wrap_angle(theta: f64) -> f64 {
    theta.rem_euclid(2.0 * PI)
}
