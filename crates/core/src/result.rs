use std::fmt;

/// Flags a temperature whose chains did not demonstrably converge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceWarning {
    /// The observed potential scale reduction.
    pub r_hat: f64,

    /// The largest acceptable value.
    pub threshold: f64,
}

impl fmt::Display for ConvergenceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r_hat {:.4} exceeds {:.4}; chains may not have converged",
            self.r_hat, self.threshold
        )
    }
}

/// Summary statistics for one temperature of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureResult {
    pub temperature: f64,
    pub dim_x: usize,
    pub dim_y: usize,
    pub mean_energy_per_spin: f64,
    pub energy_per_spin_variance: f64,
    pub specific_heat: f64,
    pub vortex_density: f64,
    pub r_hat: f64,
    pub effective_sample_size: f64,

    /// Set when the convergence diagnostic is out of bounds.
    pub warning: Option<ConvergenceWarning>,
}

impl TemperatureResult {
    /// Returns `true` unless the result carries a convergence warning.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.warning.is_none()
    }
}
